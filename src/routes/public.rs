use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. Their paths must be listed in the
/// classifier's public rules, otherwise the gate treats them as protected.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /login
        // The sign-in page. A caller who already holds a valid session is
        // redirected to the dashboard by the gate before reaching this.
        .route("/login", get(handlers::login_page))
        // POST /api/auth/login
        // Verifies credentials and sets the `session` cookie.
        .route("/api/auth/login", post(handlers::login))
        // POST /api/auth/logout
        // Clears the `session` cookie.
        .route("/api/auth/logout", post(handlers::logout))
        // GET /api/health
        .route("/api/health", get(handlers::health))
}
