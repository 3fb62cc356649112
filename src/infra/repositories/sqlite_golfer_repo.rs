use crate::domain::{models::golfer::Golfer, ports::GolferRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteGolferRepo {
    pool: SqlitePool,
}

impl SqliteGolferRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GolferRepository for SqliteGolferRepo {
    async fn create(&self, golfer: &Golfer) -> Result<Golfer, AppError> {
        sqlx::query_as::<_, Golfer>(
            "INSERT INTO golfers (id, first_name, last_name, email, phone, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id, first_name, last_name, email, phone, created_at",
        )
            .bind(&golfer.id)
            .bind(&golfer.first_name)
            .bind(&golfer.last_name)
            .bind(&golfer.email)
            .bind(&golfer.phone)
            .bind(golfer.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Golfer already exists"))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Golfer>, AppError> {
        sqlx::query_as::<_, Golfer>(
            "SELECT id, first_name, last_name, email, phone, created_at FROM golfers WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
