use crate::domain::{models::season::{Season, Tier}, ports::SeasonRepository};
use crate::error::AppError;
use crate::infra::repositories::records::attach_tiers;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteSeasonRepo {
    pool: SqlitePool,
}

impl SqliteSeasonRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_tiers(&self, seasons: Vec<Season>) -> Result<Vec<Season>, AppError> {
        if seasons.is_empty() {
            return Ok(seasons);
        }
        let placeholders = vec!["?"; seasons.len()].join(", ");
        let sql = format!("SELECT * FROM season_tiers WHERE season_id IN ({})", placeholders);

        let mut query = sqlx::query_as::<_, Tier>(&sql);
        for season in &seasons {
            query = query.bind(&season.id);
        }
        let tiers = query.fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(attach_tiers(seasons, tiers))
    }
}

#[async_trait]
impl SeasonRepository for SqliteSeasonRepo {
    async fn create(&self, season: &Season) -> Result<Season, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query(
            "INSERT INTO seasons (id, year, name, begin_date, end_date, timezone, first_tee_time, last_tee_time, gap_min, is_open, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&season.id).bind(season.year).bind(&season.name).bind(season.begin_date).bind(season.end_date)
            .bind(&season.timezone).bind(season.first_tee_time).bind(season.last_tee_time).bind(season.gap_min)
            .bind(season.is_open).bind(season.created_at)
            .execute(&mut *tx).await
            .map_err(|e| AppError::from_write(e, &format!("Season {} {} already exists", season.year, season.name)))?;

        for tier in &season.tiers {
            sqlx::query("INSERT INTO season_tiers (id, season_id, tier_type, name, begin_time, end_time, price, is_avail) VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
                .bind(&tier.id).bind(&season.id).bind(tier.tier_type.as_str()).bind(&tier.name)
                .bind(tier.begin_time).bind(tier.end_time).bind(tier.price).bind(tier.is_avail)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(season.clone())
    }

    async fn find_covering(&self, date: NaiveDate) -> Result<Option<Season>, AppError> {
        let season = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE begin_date <= ? AND end_date >= ? ORDER BY begin_date DESC LIMIT 1")
            .bind(date).bind(date).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(self.load_tiers(season.into_iter().collect()).await?.pop())
    }

    async fn find_overlapping(&self, begin: NaiveDate, end: NaiveDate) -> Result<Option<Season>, AppError> {
        let season = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE begin_date <= ? AND end_date >= ? ORDER BY begin_date ASC LIMIT 1")
            .bind(end).bind(begin).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(self.load_tiers(season.into_iter().collect()).await?.pop())
    }

    async fn list_since(&self, date: NaiveDate) -> Result<Vec<Season>, AppError> {
        let seasons = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE end_date >= ? ORDER BY begin_date ASC")
            .bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.load_tiers(seasons).await
    }
}
