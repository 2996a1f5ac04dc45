use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::AppState;

/// GET /metrics — Prometheus scrape endpoint.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics_handle.render(),
    )
}
