use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::db::bankroll_repo;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub database: &'static str,
    /// How many bankrolls currently hold the active flag; readable at a
    /// glance when probing a deployment.
    pub active_bankrolls: Option<i64>,
}

/// GET /health — readiness probe: the service is healthy when the ledger
/// store answers.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match bankroll_repo::count_active(&state.db).await {
        Ok(active) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "healthy",
                service: "betledger",
                database: "connected",
                active_bankrolls: Some(active),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed to reach database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: "unhealthy",
                    service: "betledger",
                    database: "disconnected",
                    active_bankrolls: None,
                }),
            )
        }
    }
}
