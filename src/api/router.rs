use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, tee_times, reservations, seasons, golfers};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Golfers
        .route("/api/v1/golfers", post(golfers::create_golfer))

        // Seasons
        .route("/api/v1/seasons", get(seasons::list_seasons))
        .route("/api/v1/seasons/init", post(seasons::init_seasons))

        // Tee sheet
        .route("/api/v1/tee-times", get(tee_times::get_tee_times))
        .route("/api/v1/tee-times/find", get(tee_times::find_tee_time))
        .route("/api/v1/tee-times/book", post(tee_times::book_tee_time))

        // Golfer reservations
        .route("/api/v1/reservations", get(reservations::list_reservations))
        .route("/api/v1/reservations/{reservation_id}/cancel", post(reservations::cancel_reservation))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        golfer_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
