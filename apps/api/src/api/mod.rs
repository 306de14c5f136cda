// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::TeamService;
use handlers::{health, teams};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TeamService>,
}

impl AppState {
    pub fn new(service: TeamService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Builds the HTTP router with all team routes
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Team routes
        .route("/api/teams/generate", post(teams::generate_teams))
        .route("/api/teams/validate", post(teams::validate_membership))
        .route("/api/teams", post(teams::create_team).get(teams::list_teams))
        .route("/api/teams/:id", get(teams::get_team).delete(teams::delete_team))
        .route("/api/teams/:id/members", post(teams::add_member))
        .route(
            "/api/teams/:id/members/:shooter_id",
            delete(teams::remove_member),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
