use axum::{extract::{State, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::golfer::BookingGolfer;
use crate::api::dtos::requests::{parse_date, parse_time, BookTeeTimeRequest, FindTeeTimeQuery, PlayerRequest, TeeTimesQuery};
use crate::api::dtos::responses::{DayTeeTimesResponse, TeeTimeResponse};
use crate::domain::models::reservation::{GuestInfo, Player};
use crate::domain::ports::GolferRepository;
use crate::domain::services::booking_engine::BookSlotRequest;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_tee_times(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeeTimesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&params.date)?;
    let tz = state.course_tz();

    let days = state.engine.get_day_tee_times(date).await?;
    let response: Vec<DayTeeTimesResponse> = days.iter().map(|d| DayTeeTimesResponse::from_day(d, tz)).collect();
    Ok(Json(response))
}

pub async fn find_tee_time(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FindTeeTimeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&params.date)?;
    let time = parse_time(&params.time)?;

    let slot = state.engine.find_slot(date, time).await?;
    Ok(Json(TeeTimeResponse::from_reservation(&slot, state.course_tz())))
}

pub async fn book_tee_time(
    State(state): State<Arc<AppState>>,
    BookingGolfer(golfer): BookingGolfer,
    Json(payload): Json<BookTeeTimeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&payload.date)?;
    let time = payload.time.as_deref().map(parse_time).transpose()?;

    let mut players = Vec::with_capacity(payload.players.len());
    for player in payload.players {
        match player {
            PlayerRequest::Registered { golfer_id } => {
                let found = state.golfer_repo.find_by_id(&golfer_id).await?
                    .ok_or_else(|| AppError::NotFound(format!("Golfer {} not found", golfer_id)))?;
                players.push(Player::Registered(found));
            }
            PlayerRequest::Guest { name, email, phone } => {
                if name.trim().is_empty() {
                    return Err(AppError::Validation("Guest name is required".into()));
                }
                players.push(Player::Guest(GuestInfo { name: name.trim().to_string(), email, phone }));
            }
        }
    }

    info!("book_tee_time: golfer {} requesting {} (slot {:?}, time {:?})", golfer.id, date, payload.slot, time);

    let reservation = state.engine.book_slot(BookSlotRequest {
        date,
        slot: payload.slot,
        time,
        booking_user: golfer,
        players,
    }).await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}
