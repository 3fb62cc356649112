use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Golfer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Golfer {
    pub fn new(first_name: String, last_name: String, email: String, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            email,
            phone,
            created_at: Utc::now(),
        }
    }
}
