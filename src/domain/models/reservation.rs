use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use crate::domain::models::golfer::Golfer;
use crate::domain::models::season::{Tier, TierType};

/// A foursome is the most a single slot can hold.
pub const MAX_OCCUPANCY: usize = 4;

/// Contact details for a player without an account.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GuestInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Player {
    Registered(Golfer),
    Guest(GuestInfo),
}

/// One slot on one day. Open while `booking_user` is empty and `id` is unset.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reservation {
    pub id: Option<String>,
    pub tee_time: DateTime<Utc>,
    pub tee_date: NaiveDate,
    pub slot: i32,
    pub booking_user: Option<Golfer>,
    pub players: Vec<Player>,
    pub price: f64,
    pub tier_type: TierType,
    pub tier_name: String,
    pub cancelled: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        user: Option<Golfer>,
        players: Vec<Player>,
        tee_time: DateTime<Tz>,
        slot: i32,
        tier: &Tier,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            tee_time: tee_time.with_timezone(&Utc),
            tee_date: tee_time.date_naive(),
            slot,
            booking_user: user,
            players,
            price: tier.price,
            tier_type: tier.tier_type,
            tier_name: tier.name.clone(),
            cancelled: false,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Booking golfer (if any) plus every listed player.
    pub fn occupancy(&self) -> usize {
        usize::from(self.booking_user.is_some()) + self.players.len()
    }

    pub fn is_open(&self) -> bool {
        self.booking_user.is_none() && !self.cancelled
    }

    pub fn is_owned_by(&self, golfer_id: &str) -> bool {
        self.booking_user.as_ref().is_some_and(|u| u.id == golfer_id)
    }

    pub fn cancel(&mut self) {
        let now = Utc::now();
        self.cancelled = true;
        self.cancelled_at = Some(now);
        self.updated_at = now;
    }
}
