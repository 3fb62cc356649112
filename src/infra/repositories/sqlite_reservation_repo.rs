use crate::domain::{models::reservation::Reservation, ports::ReservationRepository};
use crate::error::AppError;
use crate::infra::repositories::records::{
    assemble, registered_seats, OwnerMetadata, PlayerRecord, ReservationRecord,
    PLAYER_COLUMNS, RESERVATION_COLUMNS, RESERVATION_JOINS,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn players_for(&self, filter: &str, binds: &[String]) -> Result<Vec<PlayerRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM reservation_players p JOIN golfers g ON g.id = p.golfer_id WHERE p.reservation_id IN ({}) ORDER BY p.seat",
            PLAYER_COLUMNS, filter
        );
        let mut query = sqlx::query_as::<_, PlayerRecord>(&sql);
        for value in binds {
            query = query.bind(value);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create_booking(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        let id = reservation.id.as_deref().ok_or(AppError::Validation("Reservation has no id".into()))?;
        let owner = reservation.booking_user.as_ref().ok_or(AppError::Validation("Reservation has no booking golfer".into()))?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query(
            "INSERT INTO reservations (id, tee_time, tee_date, slot, price, tier_type, tier_name, cancelled, cancelled_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, NULL, ?, ?)"
        )
            .bind(id).bind(reservation.tee_time).bind(reservation.tee_date).bind(reservation.slot)
            .bind(reservation.price).bind(reservation.tier_type.as_str()).bind(&reservation.tier_name)
            .bind(reservation.created_at).bind(reservation.updated_at)
            .execute(&mut *tx).await
            .map_err(|e| AppError::from_write(e, &format!("Slot {} on {} is already booked", reservation.slot, reservation.tee_date)))?;

        sqlx::query("INSERT INTO reservation_owners (reservation_id, golfer_id, relation, metadata, created_at) VALUES (?, ?, 'BOOKED_TEETIME', ?, ?)")
            .bind(id).bind(&owner.id).bind(Json(OwnerMetadata::from_players(&reservation.players))).bind(reservation.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        for (seat, golfer) in registered_seats(&reservation.players) {
            sqlx::query("INSERT INTO reservation_players (reservation_id, golfer_id, seat) VALUES (?, ?, ?)")
                .bind(id).bind(&golfer.id).bind(seat)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(reservation.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        let sql = format!("SELECT {} {} WHERE r.id = ?", RESERVATION_COLUMNS, RESERVATION_JOINS);
        let record = sqlx::query_as::<_, ReservationRecord>(&sql).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        let Some(record) = record else { return Ok(None) };

        let players = self.players_for("?", &[id.to_string()]).await?;
        Ok(Some(record.into_reservation(players)))
    }

    async fn list_active_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        let sql = format!("SELECT {} {} WHERE r.tee_date = ? AND r.cancelled = 0 ORDER BY r.slot ASC", RESERVATION_COLUMNS, RESERVATION_JOINS);
        let records = sqlx::query_as::<_, ReservationRecord>(&sql).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let players = self.players_for(
            "SELECT id FROM reservations WHERE tee_date = ? AND cancelled = 0",
            &[date.to_string()],
        ).await?;
        Ok(assemble(records, players))
    }

    async fn list_by_golfer(&self, golfer_id: &str, since: NaiveDate, ascending: bool) -> Result<Vec<Reservation>, AppError> {
        let order = if ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "SELECT {} {} WHERE o.golfer_id = ? AND r.tee_date >= ? ORDER BY r.tee_time {}",
            RESERVATION_COLUMNS, RESERVATION_JOINS, order
        );
        let records = sqlx::query_as::<_, ReservationRecord>(&sql).bind(golfer_id).bind(since).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let players = self.players_for(
            "SELECT o.reservation_id FROM reservation_owners o JOIN reservations r ON r.id = o.reservation_id WHERE o.golfer_id = ? AND r.tee_date >= ?",
            &[golfer_id.to_string(), since.to_string()],
        ).await?;
        Ok(assemble(records, players))
    }

    async fn cancel(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        let cancelled_at = reservation.cancelled_at.unwrap_or_else(Utc::now);
        let result = sqlx::query("UPDATE reservations SET cancelled = 1, cancelled_at = ?, updated_at = ? WHERE id = ? AND cancelled = 0")
            .bind(cancelled_at).bind(reservation.updated_at).bind(&reservation.id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::Conflict("Reservation is already cancelled".into()));
        }

        let mut cancelled = reservation.clone();
        cancelled.cancelled = true;
        cancelled.cancelled_at = Some(cancelled_at);
        Ok(cancelled)
    }
}
