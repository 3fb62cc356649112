use std::sync::Arc;
use chrono::{Duration, NaiveDate, NaiveTime, Timelike, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn, error, debug};
use uuid::Uuid;
use crate::config::CourseSettings;
use crate::domain::models::season::{DayType, Season, Tier, TierType};
use crate::domain::ports::{SeasonRepository, SolarTimeService};
use crate::domain::services::calendar::meteorological_season_ranges;
use crate::error::AppError;

pub struct SeasonManager {
    repo: Arc<dyn SeasonRepository>,
    solar: Arc<dyn SolarTimeService>,
    course: CourseSettings,
    init_lock: Mutex<()>,
}

impl SeasonManager {
    pub fn new(repo: Arc<dyn SeasonRepository>, solar: Arc<dyn SolarTimeService>, course: CourseSettings) -> Self {
        Self { repo, solar, course, init_lock: Mutex::new(()) }
    }

    pub fn course(&self) -> &CourseSettings {
        &self.course
    }

    /// Builds (but does not persist) a season whose operating window follows the
    /// sun at the course on the season's midpoint date.
    pub async fn new_season(&self, year: i32, name: &str, begin: NaiveDate, end: NaiveDate) -> Result<Season, AppError> {
        if end < begin {
            return Err(AppError::Validation("Season must end on or after its begin date".into()));
        }
        if self.course.gap_min <= 0 {
            return Err(AppError::Validation("Tee time gap must be positive".into()));
        }

        let midpoint = begin + Duration::days((end - begin).num_days() / 2);
        let solar = self.solar
            .sunrise_sunset(midpoint, self.course.latitude, self.course.longitude)
            .await
            .inspect_err(|e| error!("Solar lookup failed for season {} {}: {}", year, name, e))?;

        let first_tee_time = round_up_to_minute(solar.sunrise);
        let last_tee_time = truncate_to_minute(solar.sunset);
        if first_tee_time > last_tee_time {
            return Err(AppError::Validation(format!(
                "Sunrise {} falls after sunset {} for season {} {}",
                first_tee_time, last_tee_time, year, name
            )));
        }

        let id = Uuid::new_v4().to_string();
        let mut season = Season {
            tiers: default_tiers(&id, first_tee_time, last_tee_time, &self.course),
            id,
            year,
            name: name.to_string(),
            begin_date: begin,
            end_date: end,
            timezone: self.course.timezone.name().to_string(),
            first_tee_time,
            last_tee_time,
            gap_min: self.course.gap_min,
            is_open: true,
            created_at: Utc::now(),
        };
        season.sort_tiers();

        for day_type in [DayType::Weekday, DayType::Weekend] {
            let gaps = season.uncovered_steps(day_type);
            if !gaps.is_empty() {
                return Err(AppError::Validation(format!(
                    "Season {} {} leaves {} {:?} tee times without a tier (first at {})",
                    year, name, gaps.len(), day_type, gaps[0]
                )));
            }
        }

        debug!(
            "Built season {} {}: {} - {} every {} min",
            year, name, season.first_tee_time, season.last_tee_time, season.gap_min
        );
        Ok(season)
    }

    /// Creates every not-yet-ended meteorological season of `year` that no
    /// stored season covers yet. Safe to call repeatedly and concurrently.
    pub async fn init_new_season(&self, year: i32, today: NaiveDate) -> Result<Vec<Season>, AppError> {
        let _guard = self.init_lock.lock().await;
        let mut created = Vec::new();

        for range in meteorological_season_ranges(year) {
            if range.end < today {
                continue;
            }

            if let Some(existing) = self.repo.find_overlapping(range.begin, range.end).await? {
                debug!("Season {} {} already covered by {}", year, range.name, existing.id);
                continue;
            }

            let season = self.new_season(year, range.name, range.begin, range.end).await?;
            match self.repo.create(&season).await {
                Ok(saved) => {
                    info!("Created season {} {} ({} - {})", year, saved.name, saved.begin_date, saved.end_date);
                    created.push(saved);
                }
                Err(AppError::Conflict(_)) => {
                    warn!("Season {} {} was created concurrently, skipping", year, range.name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(created)
    }

    pub async fn find_covering(&self, date: NaiveDate) -> Result<Option<Season>, AppError> {
        self.repo.find_covering(date).await
    }

    pub async fn list_seasons(&self, since: NaiveDate) -> Result<Vec<Season>, AppError> {
        self.repo.list_since(since).await
    }
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

fn round_up_to_minute(t: NaiveTime) -> NaiveTime {
    let truncated = truncate_to_minute(t);
    if truncated == t {
        return t;
    }
    let (next, wrapped) = truncated.overflowing_add_signed(Duration::minutes(1));
    if wrapped == 0 { next } else { truncated }
}

fn add_within_day(t: NaiveTime, d: Duration) -> Option<NaiveTime> {
    let (next, wrapped) = t.overflowing_add_signed(d);
    (wrapped == 0).then_some(next)
}

/// Six default tiers: discounted morning and afternoon blocks of a fixed number
/// of slots at each end of the window, full-price midday between them, for
/// weekdays and weekends at their own base prices.
pub fn default_tiers(season_id: &str, first: NaiveTime, last: NaiveTime, course: &CourseSettings) -> Vec<Tier> {
    let gap = Duration::minutes(course.gap_min as i64);
    let one_minute = Duration::minutes(1);

    let morning_end = add_within_day(first, gap * course.morning_slots)
        .filter(|t| *t <= last)
        .unwrap_or(last);
    let afternoon_start = add_within_day(last, -(gap * course.afternoon_slots))
        .filter(|t| *t <= last)
        .unwrap_or(first)
        .max(morning_end);

    let midday = add_within_day(morning_end, one_minute)
        .zip(add_within_day(afternoon_start, -one_minute))
        .filter(|(begin, end)| begin <= end);

    let buckets = [
        ("Weekday", course.weekday_price, [TierType::WeekdayMorning, TierType::WeekdayMidday, TierType::WeekdayAfternoon]),
        ("Weekend", course.weekend_price, [TierType::WeekendMorning, TierType::WeekendMidday, TierType::WeekendAfternoon]),
    ];

    let mut tiers = Vec::new();
    for (label, base, [morning, middle, afternoon]) in buckets {
        tiers.push(Tier::new(
            season_id.to_string(), morning, &format!("{} Morning", label),
            first, morning_end, base - course.morning_discount,
        ));
        if let Some((begin, end)) = midday {
            tiers.push(Tier::new(
                season_id.to_string(), middle, &format!("{} Midday", label),
                begin, end, base,
            ));
        }
        tiers.push(Tier::new(
            season_id.to_string(), afternoon, &format!("{} Afternoon", label),
            afternoon_start, last, base - course.afternoon_discount,
        ));
    }
    tiers
}
