#![allow(dead_code)]

use teetime_backend::{
    api::router::create_router,
    state::AppState,
    config::{Config, CourseSettings},
    infra::repositories::{
        sqlite_golfer_repo::SqliteGolferRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
        sqlite_season_repo::SqliteSeasonRepo,
    },
    domain::models::{golfer::Golfer, season::Season},
    domain::ports::{GolferRepository, SeasonRepository, SolarTimeService, SolarTimes},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use tower::ServiceExt;
use serde_json::Value;

/// Fixed sunrise and sunset, or an outage when `times` is empty.
pub struct MockSolarService {
    pub times: Option<SolarTimes>,
}

#[async_trait]
impl SolarTimeService for MockSolarService {
    async fn sunrise_sunset(&self, _date: NaiveDate, _lat: f64, _lon: f64) -> Result<SolarTimes, AppError> {
        self.times.ok_or(AppError::Unavailable("Solar API returned status 503".into()))
    }
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 06:00 to 20:00 at the default 12 minute gap: 71 tee times.
pub fn default_solar() -> SolarTimes {
    SolarTimes { sunrise: hm(6, 0), sunset: hm(20, 0) }
}

pub fn course_today() -> NaiveDate {
    Utc::now().with_timezone(&chrono_tz::America::New_York).date_naive()
}

/// First `weekday` at least two days out.
pub fn upcoming(weekday: Weekday) -> NaiveDate {
    let mut date = course_today() + Duration::days(2);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}


pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}


impl TestApp {
    pub async fn new() -> Self {
        Self::with_solar(Some(default_solar())).await
    }

    pub async fn with_solar(times: Option<SolarTimes>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            solar_api_url: "http://localhost".to_string(),
            course: CourseSettings::default(),
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteSeasonRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteGolferRepo::new(pool.clone())),
            Arc::new(MockSolarService { times }),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_golfer(&self, first_name: &str) -> Golfer {
        let golfer = Golfer::new(
            first_name.to_string(),
            "Tester".to_string(),
            format!("{}@example.com", first_name.to_lowercase()),
            None,
        );
        self.state.golfer_repo.create(&golfer).await.expect("Failed to seed golfer")
    }

    /// A season with the default tier layout covering `begin..=end`.
    pub async fn seed_season(&self, begin: NaiveDate, end: NaiveDate) -> Season {
        let season = self.state.season_manager
            .new_season(begin.year(), "test", begin, end)
            .await
            .expect("Failed to build season");
        SqliteSeasonRepo::new(self.pool.clone()).create(&season).await.expect("Failed to seed season")
    }

    /// Covers a few days back through two months ahead.
    pub async fn seed_current_season(&self) -> Season {
        let today = course_today();
        self.seed_season(today - Duration::days(3), today + Duration::days(60)).await
    }

    pub async fn send(&self, method: &str, uri: &str, golfer_id: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = golfer_id {
            builder = builder.header("X-Golfer-Id", id);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
