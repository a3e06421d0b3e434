use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Nested under `/admin`. Role enforcement happens in the gate: a session
/// without the administrator role is redirected to the dashboard and never
/// reaches these handlers.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::admin_page))
}
