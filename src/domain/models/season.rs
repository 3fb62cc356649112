use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use sqlx::FromRow;
use std::ops::RangeInclusive;
use uuid::Uuid;
use crate::error::AppError;

/// Pricing tier tags. Declaration order matters: weekday and weekend tiers each
/// form a contiguous range that date bucketing relies on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TierType {
    WeekdayMorning,
    WeekdayMidday,
    WeekdayAfternoon,
    WeekendMorning,
    WeekendMidday,
    WeekendAfternoon,
    Holiday,
    DailyDeal,
}

impl TierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierType::WeekdayMorning => "weekday_morning",
            TierType::WeekdayMidday => "weekday_midday",
            TierType::WeekdayAfternoon => "weekday_afternoon",
            TierType::WeekendMorning => "weekend_morning",
            TierType::WeekendMidday => "weekend_midday",
            TierType::WeekendAfternoon => "weekend_afternoon",
            TierType::Holiday => "holiday",
            TierType::DailyDeal => "daily_deal",
        }
    }
}

impl TryFrom<String> for TierType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "weekday_morning" => Ok(TierType::WeekdayMorning),
            "weekday_midday" => Ok(TierType::WeekdayMidday),
            "weekday_afternoon" => Ok(TierType::WeekdayAfternoon),
            "weekend_morning" => Ok(TierType::WeekendMorning),
            "weekend_midday" => Ok(TierType::WeekendMidday),
            "weekend_afternoon" => Ok(TierType::WeekendAfternoon),
            "holiday" => Ok(TierType::Holiday),
            "daily_deal" => Ok(TierType::DailyDeal),
            other => Err(AppError::Validation(format!("Unknown tier type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    /// Tier types eligible for this kind of day.
    pub fn tier_types(self) -> RangeInclusive<TierType> {
        match self {
            DayType::Weekday => TierType::WeekdayMorning..=TierType::WeekdayAfternoon,
            DayType::Weekend => TierType::WeekendMorning..=TierType::WeekendAfternoon,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Tier {
    pub id: String,
    pub season_id: String,
    #[sqlx(try_from = "String")]
    pub tier_type: TierType,
    pub name: String,
    pub begin_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price: f64,
    pub is_avail: bool,
}

impl Tier {
    pub fn new(
        season_id: String,
        tier_type: TierType,
        name: &str,
        begin_time: NaiveTime,
        end_time: NaiveTime,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            season_id,
            tier_type,
            name: name.to_string(),
            begin_time,
            end_time,
            price,
            is_avail: true,
        }
    }

    /// Both window bounds count as inside.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.begin_time <= time && time <= self.end_time
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Season {
    pub id: String,
    pub year: i32,
    pub name: String,
    pub begin_date: NaiveDate,
    pub end_date: NaiveDate,
    pub timezone: String,
    pub first_tee_time: NaiveTime,
    pub last_tee_time: NaiveTime,
    pub gap_min: i32,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub tiers: Vec<Tier>,
}

impl Season {
    pub fn gap(&self) -> Duration {
        Duration::minutes(self.gap_min as i64)
    }

    /// The stored course clock. A name that no longer parses is a corrupt row,
    /// never a reason to fall back to UTC.
    pub fn tz(&self) -> Result<Tz, AppError> {
        self.timezone.parse().map_err(|_| {
            AppError::InternalWithMsg(format!("Season {} has unknown timezone '{}'", self.id, self.timezone))
        })
    }

    /// Keeps tiers in type order so that lookups are first-match deterministic.
    pub fn sort_tiers(&mut self) {
        self.tiers.sort_by(|a, b| {
            a.tier_type.cmp(&b.tier_type).then(a.begin_time.cmp(&b.begin_time))
        });
    }

    /// Every tee time of the operating window: `first_tee_time` stepped by the
    /// gap while not past `last_tee_time`. Never wraps past midnight.
    pub fn tee_time_steps(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        let gap = self.gap();
        let last = self.last_tee_time;
        let start = (gap > Duration::zero() && self.first_tee_time <= last)
            .then_some(self.first_tee_time);

        std::iter::successors(start, move |t| {
            let (next, wrapped) = t.overflowing_add_signed(gap);
            (wrapped == 0 && next <= last).then_some(next)
        })
    }

    /// Finds the sellable tier for a local time on `date`, if any.
    pub fn time_details(&self, date: NaiveDate, time: NaiveTime) -> Option<&Tier> {
        let bucket = DayType::of(date).tier_types();
        self.tiers
            .iter()
            .filter(|t| t.is_avail && bucket.contains(&t.tier_type))
            .find(|t| t.contains(time))
    }

    /// Stepped tee times that no tier prices for the given kind of day.
    pub fn uncovered_steps(&self, day_type: DayType) -> Vec<NaiveTime> {
        let bucket = day_type.tier_types();
        self.tee_time_steps()
            .filter(|step| {
                !self.tiers.iter().any(|t| {
                    t.is_avail && bucket.contains(&t.tier_type) && t.contains(*step)
                })
            })
            .collect()
    }
}
