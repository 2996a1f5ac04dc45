use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Bankrolls
        .route("/api/bankrolls", get(handlers::bankrolls::list).post(handlers::bankrolls::create))
        .route(
            "/api/bankrolls/:id",
            get(handlers::bankrolls::detail)
                .put(handlers::bankrolls::update)
                .delete(handlers::bankrolls::delete),
        )
        .route("/api/bankrolls/:id/activate", post(handlers::bankrolls::activate))
        // Ledger
        .route(
            "/api/bankrolls/:id/transactions",
            get(handlers::transactions::list).post(handlers::transactions::create),
        )
        // Bets
        .route("/api/bankrolls/:id/bets", get(handlers::bets::list).post(handlers::bets::create))
        .route("/api/bets/:id/settle", post(handlers::bets::settle))
        .route("/api/bets/:id/payout", put(handlers::bets::amend_payout))
        // Analytics
        .route("/api/bankrolls/:id/analytics", get(handlers::analytics::summary))
        .route("/api/bankrolls/:id/balance-history", get(handlers::analytics::history))
        .route("/api/bankrolls/:id/drawdown", get(handlers::analytics::drawdown))
        // Risk
        .route("/api/bankrolls/:id/risk/daily", get(handlers::risk::daily))
        .route("/api/bankrolls/:id/risk/weekly", get(handlers::risk::weekly))
        // Kelly
        .route("/api/bankrolls/:id/kelly", post(handlers::kelly::compute))
        // Goals
        .route("/api/bankrolls/:id/goals", get(handlers::goals::list).post(handlers::goals::create))
        .route("/api/goals/:id/evaluate", post(handlers::goals::evaluate))
        .layer(middleware::from_fn(require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
