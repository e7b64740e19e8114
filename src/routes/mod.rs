pub mod candidate_routes;
pub mod catalog;
pub mod health;
pub mod onboard;
pub mod outcome;
pub mod schedule;
pub mod suggestion;

use crate::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/catalog/positions",
            get(catalog::list_positions).post(catalog::create_position),
        )
        .route("/api/catalog/positions/:id", get(catalog::get_position))
        .route(
            "/api/catalog/positions/:id/stages",
            get(catalog::list_stages).post(catalog::create_stage),
        )
        .route("/api/candidates", post(candidate_routes::intake_candidate))
        .route("/api/candidates/:id", get(candidate_routes::get_candidate))
        .route(
            "/api/candidates/:id/reject",
            post(candidate_routes::reject_candidate),
        )
        .route(
            "/api/positions/:id/candidates",
            get(candidate_routes::list_candidates_for_position),
        )
        .route(
            "/api/positions/:id/suggestions",
            post(suggestion::suggest_slots),
        )
        .route("/api/schedules", post(schedule::create_schedule))
        .route("/api/schedules/:id/cancel", post(schedule::cancel_schedule))
        .route(
            "/api/candidates/:id/schedules",
            get(schedule::schedule_history),
        )
        .route(
            "/api/schedules/:id/feedback",
            post(outcome::submit_feedback),
        )
        .route("/api/outcomes/:id", get(outcome::get_outcome))
        .route("/api/outcomes/:id/feedback", patch(outcome::edit_feedback))
        .route("/api/outcomes/:id/decision", post(outcome::set_decision))
        .route(
            "/api/onboard-requests",
            post(onboard::create_onboard_request),
        )
        .route(
            "/api/onboard-requests/:id",
            get(onboard::get_onboard_request).patch(onboard::update_offer),
        )
        .route(
            "/api/onboard-requests/:id/status",
            post(onboard::change_onboard_status),
        )
        .with_state(state)
}
