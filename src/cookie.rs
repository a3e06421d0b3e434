use axum::http::{HeaderMap, HeaderValue, header};
use chrono::Duration;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE_NAME: &str = "session";

/// session_token
///
/// Returns the value of the `session` cookie, if any `Cookie` header carries
/// a non-empty one. Headers that are not valid visible ASCII are ignored.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.trim_matches('"'))
}

/// issue_cookie
///
/// Builds the `Set-Cookie` value written at login.
pub fn issue_cookie(token: &str, max_age: Duration, secure: bool) -> Option<HeaderValue> {
    format_set_cookie(token, max_age.num_seconds().max(0), secure)
}

/// clear_cookie
///
/// Builds the `Set-Cookie` value written at logout. Same attributes as the
/// login cookie so the browser replaces it, with an immediate expiry.
pub fn clear_cookie(secure: bool) -> HeaderValue {
    let mut value = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        value.push_str("; Secure");
    }
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("session=; Max-Age=0"))
}

fn format_set_cookie(token: &str, max_age_secs: i64, secure: bool) -> Option<HeaderValue> {
    let mut value =
        format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        value.push_str("; Secure");
    }
    // A token is base64url segments joined by dots, so this only fails on a
    // corrupted token.
    HeaderValue::from_str(&value).ok()
}
