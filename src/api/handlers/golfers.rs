use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateGolferRequest;
use crate::domain::models::golfer::Golfer;
use crate::domain::ports::GolferRepository;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_golfer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGolferRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::Validation("First and last name are required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("Invalid email".into()));
    }

    let golfer = Golfer::new(
        payload.first_name.trim().to_string(),
        payload.last_name.trim().to_string(),
        payload.email.trim().to_lowercase(),
        payload.phone,
    );
    let created = state.golfer_repo.create(&golfer).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
