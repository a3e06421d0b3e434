use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// SessionClaims
///
/// The payload carried inside a session token. Every field is covered by the
/// HMAC signature, so a verified instance can be trusted as-is by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (sub): the id of the authenticated user.
    pub sub: Uuid,
    /// Role name resolved at login time. Compared against the administrator
    /// role for admin-only paths.
    pub role: String,
    /// Issued At (iat), seconds since the Unix epoch.
    pub iat: i64,
    /// Expiration Time (exp), seconds since the Unix epoch. The token is
    /// rejected once `now >= exp`.
    pub exp: i64,
}

impl SessionClaims {
    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Bad signature, malformed payload, or expired. Callers are not told which.
    #[error("invalid session token")]
    Invalid,

    #[error("failed to sign session token: {0}")]
    Encoding(String),
}

/// SessionCodec
///
/// Issues and verifies HS256-signed session tokens with a fixed expiry horizon.
///
/// The signing secret is handed in by the caller (normally from `AppConfig`)
/// instead of being read from process state, so tests can use deterministic
/// secrets. The codec holds no mutable state and is shared across requests.
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `verify_at` against the caller's clock with no
        // leeway; the library check would accept `now == exp`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// The expiry horizon applied to freshly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// issue
    ///
    /// Creates a token for `subject_id` with `role_name`, expiring `ttl` from now.
    pub fn issue(&self, subject_id: Uuid, role_name: &str) -> Result<String, SessionError> {
        self.issue_at(subject_id, role_name, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject_id: Uuid,
        role_name: &str,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let issued_at = now.timestamp();
        let claims = SessionClaims {
            sub: subject_id,
            role: role_name.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    /// verify
    ///
    /// Checks the signature and expiry of `token` against the current time.
    /// Every failure mode collapses into `SessionError::Invalid`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| SessionError::Invalid)?;
        let claims = data.claims;

        if claims.exp <= claims.iat || now.timestamp() >= claims.exp {
            return Err(SessionError::Invalid);
        }

        Ok(claims)
    }
}
