use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Persistence Records ---

/// User
///
/// A CRM account as stored in the `users` table joined with its role.
/// Only read at login; the gate itself works from the session token alone.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// The RBAC field. `admin` unlocks the admin panel.
    pub role_name: String,
    /// Argon2 PHC string. Never serialized.
    pub password_hash: String,
}

// --- Request Payloads ---

/// LoginRequest
///
/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[schema(example = "manager@acme.example")]
    pub email: String,
    pub password: String,
}

// --- Response Payloads ---

/// SessionUser
///
/// The public view of an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

/// LoginResponse
///
/// Returned by a successful login, alongside the `session` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub user: SessionUser,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
}

/// LogoutResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LogoutResponse {
    pub success: bool,
}

/// MeResponse
///
/// The identity carried by the caller's session token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
}

/// ErrorBody
///
/// The JSON shape of every error returned by the API: `{ "error": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}
