use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::state::AppState;

/// `GET /metrics`, Prometheus text format (no auth)
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        )
            .into_response(),
        None => ApiError::not_found("Metrics are disabled").into_response(),
    }
}
