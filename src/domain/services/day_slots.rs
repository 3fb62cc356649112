use std::collections::HashMap;
use chrono::{NaiveDate, TimeZone};
use crate::domain::models::reservation::Reservation;
use crate::domain::models::reserved_day::ReservedDay;
use crate::domain::models::season::Season;
use crate::error::AppError;

/// Merges the season's computed availability with the reservations already
/// persisted for `date`.
///
/// Slots are numbered from 1 in tee-time order. A persisted, non-cancelled
/// reservation holding the current slot number is used as-is; otherwise the
/// step becomes an open slot priced by its tier. Steps without a sellable tier
/// (or whose local time does not exist on that date) are skipped without
/// consuming a slot number.
pub fn new_reserved_day(date: NaiveDate, season: &Season, existing: &[Reservation]) -> Result<ReservedDay, AppError> {
    if !season.is_open {
        return Ok(ReservedDay::empty(date));
    }

    let tz = season.tz()?;
    let booked: HashMap<i32, &Reservation> = existing
        .iter()
        .filter(|r| !r.cancelled && r.tee_date == date)
        .map(|r| (r.slot, r))
        .collect();

    let mut slot = 1;
    let mut times = Vec::new();

    for step in season.tee_time_steps() {
        if let Some(reserved) = booked.get(&slot) {
            times.push((*reserved).clone());
            slot += 1;
            continue;
        }

        let Some(tier) = season.time_details(date, step) else {
            continue;
        };
        let Some(tee_time) = tz.from_local_datetime(&date.and_time(step)).earliest() else {
            continue;
        };

        times.push(Reservation::new(None, Vec::new(), tee_time, slot, tier));
        slot += 1;
    }

    Ok(ReservedDay { day: date, times })
}
