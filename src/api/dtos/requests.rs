use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct TeeTimesQuery {
    pub date: String,
}

#[derive(Deserialize)]
pub struct FindTeeTimeQuery {
    pub date: String,
    pub time: String,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerRequest {
    Registered {
        golfer_id: String,
    },
    Guest {
        name: String,
        email: Option<String>,
        phone: Option<String>,
    },
}

#[derive(Deserialize)]
pub struct BookTeeTimeRequest {
    pub date: String,
    pub slot: Option<i32>,
    pub time: Option<String>,
    #[serde(default)]
    pub players: Vec<PlayerRequest>,
}

#[derive(Deserialize)]
pub struct ReservationsQuery {
    #[serde(default)]
    pub include_past: bool,
}

#[derive(Deserialize, Default)]
pub struct InitSeasonsRequest {
    pub year: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateGolferRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))
}
