pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/ai/health", get(handlers::handle_ai_health))
        // Matching
        .route(
            "/api/v1/recommendations/jobs",
            post(handlers::handle_job_recommendations),
        )
        .route(
            "/api/v1/matches/applicants",
            post(handlers::handle_applicant_scores),
        )
        .route(
            "/api/v1/matches/talent-pool",
            post(handlers::handle_talent_pool_scores),
        )
        // Cache control: called whenever the profile or job data behind a ranking is edited
        .route(
            "/api/v1/cache/recommendations",
            delete(handlers::handle_clear_recommendations),
        )
        .route(
            "/api/v1/cache/applicants",
            delete(handlers::handle_clear_applicants),
        )
        .route(
            "/api/v1/cache/talent-pool",
            delete(handlers::handle_clear_talent_pool),
        )
        .with_state(state)
}
