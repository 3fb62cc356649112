use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::solar::http_solar_service::HttpSolarService;
use crate::infra::repositories::{
    postgres_golfer_repo::PostgresGolferRepo, postgres_reservation_repo::PostgresReservationRepo,
    postgres_season_repo::PostgresSeasonRepo,
    sqlite_golfer_repo::SqliteGolferRepo, sqlite_reservation_repo::SqliteReservationRepo,
    sqlite_season_repo::SqliteSeasonRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let solar_service = Arc::new(
        HttpSolarService::new(config.solar_api_url.clone(), config.course.timezone)
            .expect("Failed to build solar API client"),
    );

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState::new(
            config.clone(),
            Arc::new(PostgresSeasonRepo::new(pool.clone())),
            Arc::new(PostgresReservationRepo::new(pool.clone())),
            Arc::new(PostgresGolferRepo::new(pool)),
            solar_service,
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState::new(
            config.clone(),
            Arc::new(SqliteSeasonRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteGolferRepo::new(pool)),
            solar_service,
        )
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
