use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::golfer::Golfer;
use crate::domain::ports::GolferRepository;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

pub const GOLFER_HEADER: &str = "X-Golfer-Id";

/// The golfer acting on the request, resolved from the `X-Golfer-Id` header.
pub struct BookingGolfer(pub Golfer);

impl<S> FromRequestParts<S> for BookingGolfer
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let golfer_id = parts.headers.get(GOLFER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let golfer = app_state.golfer_repo.find_by_id(&golfer_id).await?
            .ok_or(AppError::NotFound("Golfer not found".into()))?;

        Span::current().record("golfer_id", golfer.id.as_str());

        Ok(BookingGolfer(golfer))
    }
}
