use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use crate::domain::models::reservation::{Player, Reservation, MAX_OCCUPANCY};
use crate::domain::ports::ReservationRepository;
use crate::error::AppError;

/// Persists a reservation with its ownership edge. Callers have already
/// checked occupancy.
pub async fn save(repo: &dyn ReservationRepository, reservation: &Reservation) -> Result<Reservation, AppError> {
    let saved = repo.create_booking(reservation).await?;
    info!(
        "Saved reservation {} (slot {} on {})",
        saved.id.as_deref().unwrap_or_default(), saved.slot, saved.tee_date
    );
    Ok(saved)
}

/// Books an open slot: requires a booking golfer, seats them alone when no
/// players are given, and enforces the foursome limit. Each booking gets a
/// fresh identity.
pub async fn book_tee_time(repo: &dyn ReservationRepository, mut reservation: Reservation) -> Result<Reservation, AppError> {
    let owner = reservation.booking_user.clone()
        .ok_or(AppError::Validation("A booking golfer is required".into()))?;

    if reservation.cancelled {
        return Err(AppError::Validation("A cancelled reservation cannot be booked again".into()));
    }
    if reservation.id.is_some() {
        return Err(AppError::Conflict("Reservation is already booked".into()));
    }

    if reservation.players.is_empty() {
        reservation.players.push(Player::Registered(owner));
    }

    let occupancy = reservation.occupancy();
    if occupancy > MAX_OCCUPANCY {
        return Err(AppError::Validation(format!(
            "A tee time holds at most {} golfers, got {}", MAX_OCCUPANCY, occupancy
        )));
    }

    let now = Utc::now();
    reservation.id = Some(Uuid::new_v4().to_string());
    reservation.created_at = now;
    reservation.updated_at = now;

    save(repo, &reservation).await
}

/// Marks a booked reservation cancelled. The record is kept; the slot reopens
/// on the next day generation.
pub async fn cancel(repo: &dyn ReservationRepository, mut reservation: Reservation) -> Result<Reservation, AppError> {
    if reservation.id.is_none() {
        return Err(AppError::Validation("Open slots cannot be cancelled".into()));
    }
    if reservation.cancelled {
        return Err(AppError::Conflict("Reservation is already cancelled".into()));
    }

    reservation.cancel();
    repo.cancel(&reservation).await
}
