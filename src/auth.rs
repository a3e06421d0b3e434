use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    cookie,
    error::ApiError,
    gate::{AccessDecision, Gate, GatePolicy},
    session::SessionClaims,
};

/// GateState
///
/// The shared, read-only gate. Pulled out of `AppState` through `FromRef`.
pub type GateState = Arc<Gate>;

/// AuthSession
///
/// The verified session claims, inserted into the request extensions by
/// `gate_middleware` whenever the request carried a valid token.
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionClaims);

/// gate_middleware
///
/// Runs every request through the gate before routing.
///
/// *Mechanism*: the `session` cookie and the URI path are handed to
/// `Gate::evaluate`. An `Allow` forwards the request (with the verified session
/// attached, if any); every other decision is answered here and the handler
/// never runs.
pub async fn gate_middleware(
    State(gate): State<GateState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let verdict = gate.evaluate(&path, cookie::session_token(request.headers()));

    if verdict.decision != AccessDecision::Allow {
        tracing::debug!(
            path = %path,
            class = ?verdict.class,
            decision = ?verdict.decision,
            "Request stopped at the gate"
        );
        return decision_response(&verdict.decision, gate.policy());
    }

    if let Some(claims) = verdict.session {
        request.extensions_mut().insert(AuthSession(claims));
    }

    next.run(request).await
}

/// decision_response
///
/// Maps a non-allow decision onto its HTTP response. Redirects use 302.
pub fn decision_response(decision: &AccessDecision, policy: &GatePolicy) -> Response {
    match decision {
        AccessDecision::Allow => StatusCode::OK.into_response(),
        AccessDecision::RedirectToLogin { from } => {
            found(&login_location(&policy.login_path, from.as_deref()))
        }
        AccessDecision::RedirectToDashboard => found(&policy.dashboard_path),
        AccessDecision::Unauthorized => ApiError::Unauthorized.into_response(),
    }
}

/// login_location
///
/// `/login` or `/login?from=%2Forders`. The original path is form-encoded.
pub fn login_location(login_path: &str, from: Option<&str>) -> String {
    match from.and_then(|from| serde_urlencoded::to_string(&[("from", from)]).ok()) {
        Some(query) => format!("{login_path}?{query}"),
        None => login_path.to_string(),
    }
}

fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// AuthUser
///
/// The identity of the caller, as proven by the session token. Handlers take
/// this as an argument; it never touches the database.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: String,
    pub claims: SessionClaims,
}

/// AuthUser Extractor Implementation
///
/// Reads the `AuthSession` left behind by `gate_middleware`. A handler mounted
/// on a path the gate treats as public sees no session and rejects with 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let AuthSession(claims) = parts
            .extensions
            .get::<AuthSession>()
            .cloned()
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role.clone(),
            claims,
        })
    }
}
