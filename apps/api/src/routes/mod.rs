pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::leads::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Priority-lead preview (stage 1 of the workflow)
        .route("/api/v1/leads/upload", post(handlers::handle_leads_upload))
        .route("/api/v1/leads/fetch", post(handlers::handle_leads_fetch))
        // Full report generation (stage 2)
        .route(
            "/api/v1/reports/upload",
            post(handlers::handle_report_upload),
        )
        .route("/api/v1/reports/fetch", post(handlers::handle_report_fetch))
        .with_state(state)
}
