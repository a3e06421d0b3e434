use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Every handler here takes `AuthUser`, which is only present once the gate
/// has verified the session cookie. Unauthenticated page requests never get
/// this far (login redirect); API requests get a 401.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/", get(handlers::dashboard_page))
        .route("/dashboard", get(handlers::dashboard_page))
        // GET /api/me
        // The identity behind the current session.
        .route("/api/me", get(handlers::me))
}
