use std::collections::HashMap;
use std::sync::Arc;
use chrono::{Months, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use parking_lot::{Mutex, RwLock};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, debug};
use crate::domain::models::golfer::Golfer;
use crate::domain::models::reservation::{Player, Reservation};
use crate::domain::models::reserved_day::ReservedDay;
use crate::domain::models::season::Season;
use crate::domain::ports::ReservationRepository;
use crate::domain::services::day_slots::new_reserved_day;
use crate::domain::services::reservations;
use crate::domain::services::season_manager::SeasonManager;
use crate::error::AppError;

pub struct BookSlotRequest {
    pub date: NaiveDate,
    pub slot: Option<i32>,
    pub time: Option<NaiveTime>,
    pub booking_user: Golfer,
    pub players: Vec<Player>,
}

/// Dates kept in the working set. Past dates are always dropped.
const MAX_ACTIVE_DAYS: usize = 14;

type DateLocks = Mutex<HashMap<NaiveDate, Arc<tokio::sync::Mutex<()>>>>;

/// Held while a date's slate is read from the store and written back. Dropping
/// it releases the date and forgets the lock once nobody else waits on it.
struct DateGuard<'a> {
    locks: &'a DateLocks,
    date: NaiveDate,
    _held: OwnedMutexGuard<()>,
}

impl Drop for DateGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        // the map and this guard hold the only references
        if locks.get(&self.date).is_some_and(|lock| Arc::strong_count(lock) == 2) {
            locks.remove(&self.date);
        }
    }
}

/// Answers availability queries and executes bookings against the store.
///
/// Every read-modify-write of a date's slate (loading it into the working set,
/// booking, cancelling) runs under that date's lock, and the store
/// independently rejects a second active reservation on the same slot.
pub struct BookingEngine {
    seasons: Arc<SeasonManager>,
    reservation_repo: Arc<dyn ReservationRepository>,
    active_days: RwLock<HashMap<NaiveDate, ReservedDay>>,
    date_locks: DateLocks,
}

impl BookingEngine {
    pub fn new(seasons: Arc<SeasonManager>, reservation_repo: Arc<dyn ReservationRepository>) -> Self {
        Self {
            seasons,
            reservation_repo,
            active_days: RwLock::new(HashMap::new()),
            date_locks: Mutex::new(HashMap::new()),
        }
    }

    fn course_tz(&self) -> Tz {
        self.seasons.course().timezone
    }

    fn course_today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.course_tz()).date_naive()
    }

    async fn lock_date(&self, date: NaiveDate) -> DateGuard<'_> {
        let lock = self.date_locks.lock().entry(date).or_default().clone();
        DateGuard { locks: &self.date_locks, date, _held: lock.lock_owned().await }
    }

    async fn load_day(&self, date: NaiveDate) -> Result<(Season, ReservedDay), AppError> {
        let existing = self.reservation_repo.list_active_by_date(date).await?;
        let season = self.seasons.find_covering(date).await?
            .ok_or_else(|| AppError::NotFound(format!("No season covers {}", date)))?;

        let day = new_reserved_day(date, &season, &existing)?;
        debug!("Generated {} slots for {} ({} booked)", day.times.len(), date, existing.len());
        Ok((season, day))
    }

    /// Caller holds the date's lock.
    fn remember_day(&self, day: ReservedDay) {
        let today = self.course_today();
        let mut days = self.active_days.write();
        days.retain(|date, _| *date >= today);
        if day.day < today {
            return;
        }

        let date = day.day;
        days.insert(date, day);
        while days.len() > MAX_ACTIVE_DAYS {
            let Some(furthest) = days.keys().filter(|d| **d != date).max().copied() else {
                break;
            };
            days.remove(&furthest);
        }
    }

    /// The full slate for `date`. One entry per course.
    pub async fn get_day_tee_times(&self, date: NaiveDate) -> Result<Vec<ReservedDay>, AppError> {
        let _guard = self.lock_date(date).await;
        let (_, day) = self.load_day(date).await?;
        self.remember_day(day.clone());
        Ok(vec![day])
    }

    /// Resolves a slot by local time, preferring the slate already loaded for
    /// the date.
    pub async fn find_slot(&self, date: NaiveDate, time: NaiveTime) -> Result<Reservation, AppError> {
        let tz = self.course_tz();
        let cached = self.active_days.read()
            .get(&date)
            .and_then(|day| day.get_by_time(tz, time).cloned());
        if let Some(found) = cached {
            return Ok(found);
        }

        let days = self.get_day_tee_times(date).await?;
        days.iter()
            .find_map(|day| day.get_by_time(tz, time).cloned())
            .ok_or_else(|| AppError::NotFound(format!("No tee time at {} on {}", time.format("%H:%M"), date)))
    }

    /// Books by slot number or by local tee time. When both are given they must
    /// name the same slot.
    pub async fn book_slot(&self, request: BookSlotRequest) -> Result<Reservation, AppError> {
        let _guard = self.lock_date(request.date).await;

        let (season, mut day) = self.load_day(request.date).await?;
        let tz = season.tz()?;
        let target = match (request.slot, request.time) {
            (Some(slot), None) => day.get_by_slot(slot),
            (None, Some(time)) => day.get_by_time(tz, time),
            (Some(slot), Some(time)) => {
                let by_slot = day.get_by_slot(slot);
                if by_slot.map(|r| r.slot) != day.get_by_time(tz, time).map(|r| r.slot) {
                    return Err(AppError::Validation(format!(
                        "Slot {} does not tee off at {}", slot, time.format("%H:%M")
                    )));
                }
                by_slot
            }
            (None, None) => return Err(AppError::Validation("Either a slot or a time is required".into())),
        }
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Requested tee time does not exist on {}", request.date)))?;

        if !target.is_open() {
            return Err(AppError::Conflict(format!("Slot {} on {} is already booked", target.slot, request.date)));
        }
        if target.tee_time < Utc::now() {
            return Err(AppError::Validation("Cannot book a tee time in the past".into()));
        }

        let golfer_id = request.booking_user.id.clone();
        let mut reservation = target;
        reservation.booking_user = Some(request.booking_user);
        reservation.players = request.players;

        let booked = reservations::book_tee_time(self.reservation_repo.as_ref(), reservation).await?;
        day.replace_slot(booked.clone());
        self.remember_day(day);

        info!("Booked slot {} on {} for golfer {}", booked.slot, booked.tee_date, golfer_id);
        Ok(booked)
    }

    pub async fn cancel_reservation(&self, golfer_id: &str, reservation_id: &str) -> Result<Reservation, AppError> {
        let reservation = self.reservation_repo.find_by_id(reservation_id).await?
            .filter(|r| r.is_owned_by(golfer_id))
            .ok_or(AppError::NotFound("Reservation not found or not owned by golfer".into()))?;

        let date = reservation.tee_date;
        let _guard = self.lock_date(date).await;

        let cancelled = reservations::cancel(self.reservation_repo.as_ref(), reservation).await?;
        self.active_days.write().remove(&date);

        info!("Cancelled reservation {} (slot {} on {})", reservation_id, cancelled.slot, date);
        Ok(cancelled)
    }

    /// Upcoming reservations soonest first, or with `include_past` the last
    /// twelve months newest first.
    pub async fn get_user_reservations(&self, golfer_id: &str, include_past: bool) -> Result<Vec<Reservation>, AppError> {
        let today = self.course_today();
        if include_past {
            let since = today.checked_sub_months(Months::new(12)).unwrap_or(today);
            self.reservation_repo.list_by_golfer(golfer_id, since, false).await
        } else {
            self.reservation_repo.list_by_golfer(golfer_id, today, true).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration as StdDuration;
    use async_trait::async_trait;
    use chrono::Duration;
    use crate::config::CourseSettings;
    use crate::domain::ports::{SeasonRepository, SolarTimeService, SolarTimes};
    use crate::domain::services::season_manager::default_tiers;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    struct OneSeason(Season);

    #[async_trait]
    impl SeasonRepository for OneSeason {
        async fn create(&self, season: &Season) -> Result<Season, AppError> {
            Ok(season.clone())
        }
        async fn find_covering(&self, date: NaiveDate) -> Result<Option<Season>, AppError> {
            Ok((self.0.begin_date <= date && date <= self.0.end_date).then(|| self.0.clone()))
        }
        async fn find_overlapping(&self, _begin: NaiveDate, _end: NaiveDate) -> Result<Option<Season>, AppError> {
            Ok(Some(self.0.clone()))
        }
        async fn list_since(&self, _date: NaiveDate) -> Result<Vec<Season>, AppError> {
            Ok(vec![self.0.clone()])
        }
    }

    struct NoSolar;

    #[async_trait]
    impl SolarTimeService for NoSolar {
        async fn sunrise_sunset(&self, _date: NaiveDate, _lat: f64, _lon: f64) -> Result<SolarTimes, AppError> {
            Err(AppError::Unavailable("offline".into()))
        }
    }

    /// In-memory store whose next date listing can be made to stall after it
    /// has taken its snapshot.
    #[derive(Default)]
    struct StallingRepo {
        saved: Mutex<Vec<Reservation>>,
        stall_next_listing: AtomicBool,
    }

    #[async_trait]
    impl ReservationRepository for StallingRepo {
        async fn create_booking(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
            let mut saved = self.saved.lock();
            if saved.iter().any(|r| !r.cancelled && r.tee_date == reservation.tee_date && r.slot == reservation.slot) {
                return Err(AppError::Conflict("taken".into()));
            }
            saved.push(reservation.clone());
            Ok(reservation.clone())
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
            Ok(self.saved.lock().iter().find(|r| r.id.as_deref() == Some(id)).cloned())
        }
        async fn list_active_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
            let snapshot: Vec<Reservation> = self.saved.lock().iter()
                .filter(|r| !r.cancelled && r.tee_date == date)
                .cloned()
                .collect();
            if self.stall_next_listing.swap(false, Ordering::SeqCst) {
                tokio::time::sleep(StdDuration::from_millis(200)).await;
            }
            Ok(snapshot)
        }
        async fn list_by_golfer(&self, golfer_id: &str, _since: NaiveDate, _ascending: bool) -> Result<Vec<Reservation>, AppError> {
            Ok(self.saved.lock().iter().filter(|r| r.is_owned_by(golfer_id)).cloned().collect())
        }
        async fn cancel(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
            let mut saved = self.saved.lock();
            let entry = saved.iter_mut()
                .find(|r| r.id == reservation.id && !r.cancelled)
                .ok_or(AppError::Conflict("Reservation is already cancelled".into()))?;
            *entry = reservation.clone();
            Ok(reservation.clone())
        }
    }

    fn engine() -> (Arc<BookingEngine>, Arc<StallingRepo>) {
        let course = CourseSettings::default();
        let today = Utc::now().with_timezone(&course.timezone).date_naive();
        let (first, last) = (hm(6, 0), hm(20, 0));

        let mut season = Season {
            id: "s1".into(),
            year: 2025,
            name: "test".into(),
            begin_date: today - Duration::days(3),
            end_date: today + Duration::days(400),
            timezone: course.timezone.name().to_string(),
            first_tee_time: first,
            last_tee_time: last,
            gap_min: course.gap_min,
            is_open: true,
            created_at: Utc::now(),
            tiers: default_tiers("s1", first, last, &course),
        };
        season.sort_tiers();

        let repo = Arc::new(StallingRepo::default());
        let seasons = Arc::new(SeasonManager::new(Arc::new(OneSeason(season)), Arc::new(NoSolar), course));
        (Arc::new(BookingEngine::new(seasons, repo.clone())), repo)
    }

    fn golfer(name: &str) -> Golfer {
        Golfer::new(name.into(), "Tester".into(), format!("{}@example.com", name), None)
    }

    fn request(date: NaiveDate, slot: Option<i32>, time: Option<NaiveTime>) -> BookSlotRequest {
        BookSlotRequest { date, slot, time, booking_user: golfer("ann"), players: Vec::new() }
    }

    #[tokio::test]
    async fn test_slow_availability_read_does_not_hide_booking() {
        let (engine, repo) = engine();
        let date = engine.course_today() + Duration::days(5);
        repo.stall_next_listing.store(true, Ordering::SeqCst);

        let reader = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.get_day_tee_times(date).await })
        };
        // let the read take its snapshot and stall
        tokio::time::sleep(StdDuration::from_millis(50)).await;

        let booked = engine.book_slot(request(date, Some(3), None)).await.unwrap();
        reader.await.unwrap().unwrap();

        let found = engine.find_slot(date, hm(6, 24)).await.unwrap();
        assert_eq!(found.id, booked.id);
        assert!(!found.is_open());
        assert_eq!(found.occupancy(), 2);
    }

    #[tokio::test]
    async fn test_working_set_is_bounded() {
        let (engine, _) = engine();
        let today = engine.course_today();

        for offset in 2..32 {
            engine.get_day_tee_times(today + Duration::days(offset)).await.unwrap();
        }

        let days = engine.active_days.read();
        assert!(days.len() <= MAX_ACTIVE_DAYS);
        assert!(days.contains_key(&(today + Duration::days(31))));
        assert!(days.contains_key(&(today + Duration::days(2))));
    }

    #[tokio::test]
    async fn test_past_dates_are_not_kept() {
        let (engine, _) = engine();
        let yesterday = engine.course_today() - Duration::days(1);

        let days = engine.get_day_tee_times(yesterday).await.unwrap();
        assert!(!days[0].times.is_empty());
        assert!(engine.active_days.read().is_empty());
    }

    #[tokio::test]
    async fn test_date_locks_are_released() {
        let (engine, _) = engine();
        let date = engine.course_today() + Duration::days(4);

        engine.get_day_tee_times(date).await.unwrap();
        let booked = engine.book_slot(request(date, Some(1), None)).await.unwrap();
        let id = booked.id.clone().unwrap();
        engine.cancel_reservation(&booked.booking_user.unwrap().id, &id).await.unwrap();

        assert!(engine.date_locks.lock().is_empty());
    }

    #[tokio::test]
    async fn test_slot_and_time_must_agree() {
        let (engine, _) = engine();
        let date = engine.course_today() + Duration::days(6);

        let err = engine.book_slot(request(date, Some(3), Some(hm(7, 0)))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let booked = engine.book_slot(request(date, Some(3), Some(hm(6, 24)))).await.unwrap();
        assert_eq!(booked.slot, 3);
    }
}
