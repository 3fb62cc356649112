use crate::domain::models::{
    golfer::Golfer, reservation::Reservation, season::Season,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

#[async_trait]
pub trait SeasonRepository: Send + Sync {
    /// Persists the season together with its tiers.
    async fn create(&self, season: &Season) -> Result<Season, AppError>;
    async fn find_covering(&self, date: NaiveDate) -> Result<Option<Season>, AppError>;
    async fn find_overlapping(&self, begin: NaiveDate, end: NaiveDate) -> Result<Option<Season>, AppError>;
    async fn list_since(&self, date: NaiveDate) -> Result<Vec<Season>, AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomic conditional create: the reservation row, the owner edge with guest
    /// metadata, and registered co-players. Fails with `Conflict` when an active
    /// reservation already holds the same (date, slot).
    async fn create_booking(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    /// Non-cancelled reservations on `date`, ordered by slot.
    async fn list_active_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError>;
    async fn list_by_golfer(&self, golfer_id: &str, since: NaiveDate, ascending: bool) -> Result<Vec<Reservation>, AppError>;
    /// Flags the reservation cancelled. `Conflict` if it already was.
    async fn cancel(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
}

#[async_trait]
pub trait GolferRepository: Send + Sync {
    async fn create(&self, golfer: &Golfer) -> Result<Golfer, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Golfer>, AppError>;
}

/// Local sunrise and sunset on the course clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTimes {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

#[async_trait]
pub trait SolarTimeService: Send + Sync {
    async fn sunrise_sunset(&self, date: NaiveDate, lat: f64, lon: f64) -> Result<SolarTimes, AppError>;
}
