use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{Datelike, NaiveDate, Utc};
use crate::state::AppState;
use crate::api::dtos::requests::InitSeasonsRequest;
use crate::api::dtos::responses::InitSeasonsResponse;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn course_today(state: &AppState) -> NaiveDate {
    Utc::now().with_timezone(&state.course_tz()).date_naive()
}

/// Current and upcoming seasons. The first call on an empty store initializes
/// the current year, plus last year's winter while it is still running.
pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let today = course_today(&state);
    let mut seasons = state.season_manager.list_seasons(today).await?;

    if seasons.is_empty() {
        info!("No current seasons, initializing {}", today.year());
        for year in [today.year() - 1, today.year()] {
            state.season_manager.init_new_season(year, today).await?;
        }
        seasons = state.season_manager.list_seasons(today).await?;
    }

    Ok(Json(seasons))
}

pub async fn init_seasons(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InitSeasonsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let today = course_today(&state);
    let year = payload.year.unwrap_or(today.year());

    let created = state.season_manager.init_new_season(year, today).await?;
    let status = if created.is_empty() { StatusCode::OK } else { StatusCode::CREATED };

    Ok((status, Json(InitSeasonsResponse { year, created })))
}
