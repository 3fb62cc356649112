use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use crate::domain::models::reservation::Reservation;
use crate::domain::models::reserved_day::ReservedDay;
use crate::domain::models::season::{Season, TierType};

/// Public view of a slot. Who booked it stays private.
#[derive(Serialize)]
pub struct TeeTimeResponse {
    pub slot: i32,
    pub tee_time: DateTime<Utc>,
    pub local_time: String,
    pub price: f64,
    pub tier_type: TierType,
    pub tier_name: String,
    pub open: bool,
    pub occupancy: usize,
}

impl TeeTimeResponse {
    pub fn from_reservation(res: &Reservation, tz: Tz) -> Self {
        Self {
            slot: res.slot,
            tee_time: res.tee_time,
            local_time: res.tee_time.with_timezone(&tz).format("%H:%M").to_string(),
            price: res.price,
            tier_type: res.tier_type,
            tier_name: res.tier_name.clone(),
            open: res.is_open(),
            occupancy: res.occupancy(),
        }
    }
}

#[derive(Serialize)]
pub struct DayTeeTimesResponse {
    pub date: NaiveDate,
    pub open_count: usize,
    pub slots: Vec<TeeTimeResponse>,
}

impl DayTeeTimesResponse {
    pub fn from_day(day: &ReservedDay, tz: Tz) -> Self {
        Self {
            date: day.day,
            open_count: day.open_slots().count(),
            slots: day.times.iter().map(|r| TeeTimeResponse::from_reservation(r, tz)).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct InitSeasonsResponse {
    pub year: i32,
    pub created: Vec<Season>,
}
