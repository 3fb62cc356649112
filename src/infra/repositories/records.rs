use std::collections::HashMap;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use crate::domain::models::golfer::Golfer;
use crate::domain::models::reservation::{GuestInfo, Player, Reservation};
use crate::domain::models::season::{Season, Tier, TierType};

/// Columns shared by every reservation read. Both dialects alias the owner
/// join the same way so one record type decodes either.
pub const RESERVATION_COLUMNS: &str = "r.id, r.tee_time, r.tee_date, r.slot, r.price, r.tier_type, r.tier_name, \
     r.cancelled, r.cancelled_at, r.created_at, r.updated_at, \
     g.id AS owner_id, g.first_name AS owner_first_name, g.last_name AS owner_last_name, \
     g.email AS owner_email, g.phone AS owner_phone, g.created_at AS owner_created_at, o.metadata";

pub const RESERVATION_JOINS: &str = "FROM reservations r \
     JOIN reservation_owners o ON o.reservation_id = r.id \
     JOIN golfers g ON g.id = o.golfer_id";

pub const PLAYER_COLUMNS: &str = "p.reservation_id, p.seat, \
     g.id, g.first_name, g.last_name, g.email, g.phone, g.created_at";

/// Guests have no golfer row, so they ride on the ownership edge with the seat
/// they hold in the roster.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct OwnerMetadata {
    #[serde(default)]
    pub guests: Vec<SeatedGuest>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeatedGuest {
    pub seat: i32,
    #[serde(flatten)]
    pub guest: GuestInfo,
}

impl OwnerMetadata {
    pub fn from_players(players: &[Player]) -> Self {
        let guests = seated(players)
            .filter_map(|(seat, player)| match player {
                Player::Guest(guest) => Some(SeatedGuest { seat, guest: guest.clone() }),
                Player::Registered(_) => None,
            })
            .collect();
        Self { guests }
    }
}

fn seated(players: &[Player]) -> impl Iterator<Item = (i32, &Player)> {
    players.iter().enumerate().map(|(i, p)| (i as i32 + 1, p))
}

/// Registered players with their 1-based roster seat.
pub fn registered_seats(players: &[Player]) -> Vec<(i32, &Golfer)> {
    seated(players)
        .filter_map(|(seat, player)| match player {
            Player::Registered(golfer) => Some((seat, golfer)),
            Player::Guest(_) => None,
        })
        .collect()
}

#[derive(Debug, FromRow)]
pub struct ReservationRecord {
    pub id: String,
    pub tee_time: DateTime<Utc>,
    pub tee_date: NaiveDate,
    pub slot: i32,
    pub price: f64,
    #[sqlx(try_from = "String")]
    pub tier_type: TierType,
    pub tier_name: String,
    pub cancelled: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: String,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
    pub owner_created_at: DateTime<Utc>,
    pub metadata: Json<OwnerMetadata>,
}

#[derive(Debug, FromRow)]
pub struct PlayerRecord {
    pub reservation_id: String,
    pub seat: i32,
    #[sqlx(flatten)]
    pub golfer: Golfer,
}

impl ReservationRecord {
    pub fn into_reservation(self, players: Vec<PlayerRecord>) -> Reservation {
        let Json(metadata) = self.metadata;

        let mut roster: Vec<(i32, Player)> = players
            .into_iter()
            .map(|p| (p.seat, Player::Registered(p.golfer)))
            .chain(metadata.guests.into_iter().map(|g| (g.seat, Player::Guest(g.guest))))
            .collect();
        roster.sort_by_key(|(seat, _)| *seat);

        Reservation {
            id: Some(self.id),
            tee_time: self.tee_time,
            tee_date: self.tee_date,
            slot: self.slot,
            booking_user: Some(Golfer {
                id: self.owner_id,
                first_name: self.owner_first_name,
                last_name: self.owner_last_name,
                email: self.owner_email,
                phone: self.owner_phone,
                created_at: self.owner_created_at,
            }),
            players: roster.into_iter().map(|(_, p)| p).collect(),
            price: self.price,
            tier_type: self.tier_type,
            tier_name: self.tier_name,
            cancelled: self.cancelled,
            cancelled_at: self.cancelled_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Pairs each reservation with its registered players, keeping record order.
pub fn assemble(records: Vec<ReservationRecord>, players: Vec<PlayerRecord>) -> Vec<Reservation> {
    let mut by_reservation: HashMap<String, Vec<PlayerRecord>> = HashMap::new();
    for player in players {
        by_reservation.entry(player.reservation_id.clone()).or_default().push(player);
    }

    records
        .into_iter()
        .map(|record| {
            let players = by_reservation.remove(&record.id).unwrap_or_default();
            record.into_reservation(players)
        })
        .collect()
}

/// Hands each season its tiers in lookup order.
pub fn attach_tiers(seasons: Vec<Season>, tiers: Vec<Tier>) -> Vec<Season> {
    let mut by_season: HashMap<String, Vec<Tier>> = HashMap::new();
    for tier in tiers {
        by_season.entry(tier.season_id.clone()).or_default().push(tier);
    }

    seasons
        .into_iter()
        .map(|mut season| {
            season.tiers = by_season.remove(&season.id).unwrap_or_default();
            season.sort_tiers();
            season
        })
        .collect()
}
