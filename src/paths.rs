use serde::Serialize;

/// PathClass
///
/// The coarse access class of a request path, as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathClass {
    /// Static assets and framework internals. Bypasses authentication entirely.
    Skip,
    /// Reachable without a session (login page, login/logout API, health check).
    Public,
    /// Requires a valid session.
    Protected,
    /// Requires a valid session whose role is the administrator role.
    AdminOnly,
}

/// PathPattern
///
/// How a rule matches a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches the path exactly.
    Exact(String),
    /// Matches the path itself or anything below it (`p` or `p/...`).
    /// `/login` matches `/login` and `/login/reset` but never `/login2`.
    Subtree(String),
}

impl PathPattern {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn subtree(path: impl Into<String>) -> Self {
        let mut path = path.into();
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        Self::Subtree(path)
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Subtree(p) => {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub pattern: PathPattern,
    pub class: PathClass,
}

/// PathClassifier
///
/// An ordered list of rules evaluated first-match-wins. Any path that no rule
/// claims is `Protected`.
///
/// The order of insertion is the contract: skip rules must be registered before
/// public rules, and public rules before admin-only rules. The builder methods
/// do not reorder anything.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    rules: Vec<PathRule>,
}

impl PathClassifier {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// crm_default
    ///
    /// The rule set used by the CRM frontend: framework/static assets first,
    /// then the unauthenticated entry points, then the admin subtree.
    pub fn crm_default() -> Self {
        Self::new()
            // Framework internals and static asset folders.
            .skip(PathPattern::subtree("/_next"))
            .skip(PathPattern::subtree("/static"))
            .skip(PathPattern::subtree("/images"))
            .skip(PathPattern::subtree("/icons"))
            .skip(PathPattern::subtree("/uploads/public"))
            .skip(PathPattern::exact("/favicon.ico"))
            .skip(PathPattern::exact("/manifest.json"))
            .skip(PathPattern::exact("/manifest.webmanifest"))
            .skip(PathPattern::exact("/robots.txt"))
            .skip(PathPattern::exact("/sitemap.xml"))
            // Unauthenticated entry points.
            .public(PathPattern::subtree("/login"))
            .public(PathPattern::exact("/api/auth/login"))
            .public(PathPattern::exact("/api/auth/logout"))
            .public(PathPattern::exact("/api/health"))
            .public(PathPattern::subtree("/swagger-ui"))
            .public(PathPattern::subtree("/api-docs"))
            // Admin panel.
            .admin_only(PathPattern::subtree("/admin"))
    }

    pub fn rule(mut self, rule: PathRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn skip(self, pattern: PathPattern) -> Self {
        self.rule(PathRule {
            pattern,
            class: PathClass::Skip,
        })
    }

    pub fn public(self, pattern: PathPattern) -> Self {
        self.rule(PathRule {
            pattern,
            class: PathClass::Public,
        })
    }

    pub fn admin_only(self, pattern: PathPattern) -> Self {
        self.rule(PathRule {
            pattern,
            class: PathClass::AdminOnly,
        })
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// classify
    ///
    /// Returns the class of the first rule matching `path`, or `Protected`.
    pub fn classify(&self, path: &str) -> PathClass {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.class)
            .unwrap_or(PathClass::Protected)
    }
}
