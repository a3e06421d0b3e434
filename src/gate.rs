use chrono::{DateTime, Utc};

use crate::{
    paths::{PathClass, PathClassifier},
    session::{SessionClaims, SessionCodec},
};

/// GatePolicy
///
/// The fixed locations and names the gate redirects to or compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    /// Where unauthenticated page requests are sent.
    pub login_path: String,
    /// Where authenticated users are sent away from the login page, and where
    /// non-admins land when they request an admin-only path.
    pub dashboard_path: String,
    /// The role name that grants access to admin-only paths.
    pub admin_role: String,
    /// Protected paths under this prefix get a 401 instead of a redirect.
    pub api_prefix: String,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
            admin_role: "admin".to_string(),
            api_prefix: "/api/".to_string(),
        }
    }
}

/// AccessDecision
///
/// The single outcome of running a request through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// Send the browser to the login page. `from` is the originally requested
    /// path, omitted for the root path.
    RedirectToLogin { from: Option<String> },
    RedirectToDashboard,
    /// 401 with a JSON error body, used for API paths.
    Unauthorized,
}

/// Verdict
///
/// What the gate decided for one request, plus what it learned on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub class: PathClass,
    pub decision: AccessDecision,
    /// The verified session, if a valid token was presented. Always `None` for
    /// skip paths since no verification happens there.
    pub session: Option<SessionClaims>,
}

/// Gate
///
/// Composes the path classifier and the session codec into a per-request
/// decision function. Holds no state between calls.
#[derive(Clone)]
pub struct Gate {
    classifier: PathClassifier,
    codec: SessionCodec,
    policy: GatePolicy,
}

impl Gate {
    pub fn new(classifier: PathClassifier, codec: SessionCodec, policy: GatePolicy) -> Self {
        Self {
            classifier,
            codec,
            policy,
        }
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    pub fn classify(&self, path: &str) -> PathClass {
        self.classifier.classify(path)
    }

    pub fn evaluate(&self, path: &str, token: Option<&str>) -> Verdict {
        self.evaluate_at(path, token, Utc::now())
    }

    /// evaluate_at
    ///
    /// Decides the fate of a request for `path` carrying `token` at time `now`.
    ///
    /// 1. Skip paths are allowed before any token work happens.
    /// 2. The token is verified for every other class, so that a logged-in user
    ///    hitting the login page can be sent to the dashboard.
    /// 3. Public paths are allowed, except the login page with a valid session.
    /// 4. Protected paths without a valid session get a 401 (API) or a login
    ///    redirect (pages).
    /// 5. Admin-only paths with a non-admin session redirect to the dashboard.
    pub fn evaluate_at(&self, path: &str, token: Option<&str>, now: DateTime<Utc>) -> Verdict {
        let class = self.classifier.classify(path);

        if class == PathClass::Skip {
            return Verdict {
                class,
                decision: AccessDecision::Allow,
                session: None,
            };
        }

        let session = token
            .filter(|t| !t.is_empty())
            .and_then(|t| self.codec.verify_at(t, now).ok());

        let decision = match (class, &session) {
            (PathClass::Public, Some(_)) if path == self.policy.login_path => {
                AccessDecision::RedirectToDashboard
            }
            (PathClass::Public, _) => AccessDecision::Allow,
            (_, None) => self.reject(path),
            (PathClass::AdminOnly, Some(claims)) if claims.role != self.policy.admin_role => {
                AccessDecision::RedirectToDashboard
            }
            _ => AccessDecision::Allow,
        };

        Verdict {
            class,
            decision,
            session,
        }
    }

    fn reject(&self, path: &str) -> AccessDecision {
        if path.starts_with(&self.policy.api_prefix) {
            return AccessDecision::Unauthorized;
        }

        let from = (path != "/").then(|| path.to_string());
        AccessDecision::RedirectToLogin { from }
    }
}
