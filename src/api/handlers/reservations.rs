use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::golfer::BookingGolfer;
use crate::api::dtos::requests::ReservationsQuery;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    BookingGolfer(golfer): BookingGolfer,
    Query(params): Query<ReservationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = state.engine.get_user_reservations(&golfer.id, params.include_past).await?;
    Ok(Json(reservations))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    BookingGolfer(golfer): BookingGolfer,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.engine.cancel_reservation(&golfer.id, &reservation_id).await?;
    Ok(Json(cancelled))
}
