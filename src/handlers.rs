use crate::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    cookie,
    error::ApiError,
    models::{
        ErrorBody, HealthResponse, LoginRequest, LoginResponse, LogoutResponse, MeResponse,
        SessionUser,
    },
    password,
};
use axum::{
    Json,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use chrono::Utc;

// --- Session Endpoints ---

/// login
///
/// [Public Route] Exchanges email + password for a session cookie.
///
/// *Flow*: normalizes the email, loads the account, verifies the Argon2 hash,
/// then issues a signed token and writes it to the `session` cookie. An unknown
/// email and a wrong password produce the same 401.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let Some(user) = state.repo.find_by_email(&email).await? else {
        tracing::info!("Login rejected: unknown account");
        return Err(ApiError::InvalidCredentials);
    };

    if !password::verify_password(&payload.password, &user.password_hash) {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let codec = state.gate.codec();
    let now = Utc::now();
    let token = codec
        .issue_at(user.id, &user.role_name, now)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let set_cookie = cookie::issue_cookie(&token, codec.ttl(), state.config.secure_cookies())
        .ok_or_else(|| ApiError::Internal("session token is not a valid cookie value".into()))?;

    tracing::info!(user_id = %user.id, role = %user.role_name, "User logged in");

    let body = LoginResponse {
        user: SessionUser {
            id: user.id,
            email: user.email,
            role: user.role_name,
        },
        expires_at: now + codec.ttl(),
    };

    Ok(([(header::SET_COOKIE, set_cookie)], Json(body)))
}

/// logout
///
/// [Public Route] Deletes the session cookie. Succeeds with or without a session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cookie cleared", body = LogoutResponse))
)]
pub async fn logout(State(config): State<AppConfig>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, cookie::clear_cookie(config.secure_cookies()))],
        Json(LogoutResponse { success: true }),
    )
}

/// health
///
/// [Public Route] Liveness probe for load balancers.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// me
///
/// [Authenticated Route] The account behind the caller's session. A token
/// whose account has since been removed is treated as unauthorized.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "No valid session", body = ErrorBody)
    )
)]
pub async fn me(
    AuthUser { id, role, claims }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(MeResponse {
        id,
        email: user.email,
        role,
        expires_at: claims.expires_at(),
    }))
}

// --- Pages ---
// The CRM frontend renders these; the server only needs something to guard.

pub async fn login_page() -> Html<&'static str> {
    Html("<!doctype html><title>Sign in</title><main id=\"login\"></main>")
}

pub async fn dashboard_page(AuthUser { role, .. }: AuthUser) -> Html<String> {
    Html(format!(
        "<!doctype html><title>Dashboard</title><main id=\"dashboard\" data-role=\"{role}\"></main>"
    ))
}

/// The gate has already checked the administrator role for this subtree.
pub async fn admin_page(AuthUser { id, .. }: AuthUser) -> Html<String> {
    Html(format!(
        "<!doctype html><title>Admin</title><main id=\"admin\" data-user=\"{id}\"></main>"
    ))
}
