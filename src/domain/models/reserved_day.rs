use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use crate::domain::models::reservation::Reservation;

/// The full slate of slots for one calendar date, open and booked alike.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReservedDay {
    pub day: NaiveDate,
    pub times: Vec<Reservation>,
}

impl ReservedDay {
    pub fn empty(day: NaiveDate) -> Self {
        Self { day, times: Vec::new() }
    }

    pub fn get_by_slot(&self, slot: i32) -> Option<&Reservation> {
        self.times.iter().find(|r| r.slot == slot)
    }

    /// Looks a slot up by its local hour and minute on the course clock.
    pub fn get_by_time(&self, tz: Tz, time: NaiveTime) -> Option<&Reservation> {
        self.times.iter().find(|r| {
            let local = r.tee_time.with_timezone(&tz);
            local.hour() == time.hour() && local.minute() == time.minute()
        })
    }

    pub fn open_slots(&self) -> impl Iterator<Item = &Reservation> {
        self.times.iter().filter(|r| r.is_open())
    }

    /// Overwrites the entry holding `reservation.slot`. Returns false when the
    /// slate has no such slot.
    pub fn replace_slot(&mut self, reservation: Reservation) -> bool {
        match self.times.iter_mut().find(|r| r.slot == reservation.slot) {
            Some(entry) => {
                *entry = reservation;
                true
            }
            None => false,
        }
    }
}
