use crm_gateway::paths::{PathClass, PathClassifier, PathPattern};
use proptest::prelude::*;

const SKIP_ROOTS: &[&str] = &["/_next", "/static", "/images", "/icons", "/uploads/public"];
const SKIP_FILES: &[&str] = &[
    "/favicon.ico",
    "/manifest.json",
    "/manifest.webmanifest",
    "/robots.txt",
    "/sitemap.xml",
];
const PUBLIC_PATHS: &[&str] = &["/login", "/api/auth/login", "/api/auth/logout", "/api/health"];

#[test]
fn test_static_assets_are_skipped() {
    let classifier = PathClassifier::crm_default();

    for path in SKIP_FILES.iter().chain(SKIP_ROOTS) {
        assert_eq!(classifier.classify(path), PathClass::Skip, "{path}");
    }
    assert_eq!(
        classifier.classify("/_next/static/chunks/main-abc123.js"),
        PathClass::Skip
    );
    assert_eq!(classifier.classify("/images/logo.png"), PathClass::Skip);
}

#[test]
fn test_entry_points_are_public() {
    let classifier = PathClassifier::crm_default();

    for path in PUBLIC_PATHS {
        assert_eq!(classifier.classify(path), PathClass::Public, "{path}");
    }
    assert_eq!(classifier.classify("/login/reset"), PathClass::Public);
    assert_eq!(classifier.classify("/swagger-ui/index.html"), PathClass::Public);
}

#[test]
fn test_lookalike_paths_do_not_match_public_entries() {
    let classifier = PathClassifier::crm_default();

    assert_eq!(classifier.classify("/login2"), PathClass::Protected);
    assert_eq!(classifier.classify("/loginx/anything"), PathClass::Protected);
    assert_eq!(classifier.classify("/api/healthz"), PathClass::Protected);
    assert_eq!(classifier.classify("/api/auth/login/extra"), PathClass::Protected);
    assert_eq!(classifier.classify("/imagesarchive"), PathClass::Protected);
}

#[test]
fn test_everything_else_is_protected() {
    let classifier = PathClassifier::crm_default();

    for path in ["/", "/dashboard", "/orders", "/orders/17", "/api/me", "/api/orders", "/warehouse"] {
        assert_eq!(classifier.classify(path), PathClass::Protected, "{path}");
    }
}

#[test]
fn test_admin_subtree_is_admin_only() {
    let classifier = PathClassifier::crm_default();

    assert_eq!(classifier.classify("/admin"), PathClass::AdminOnly);
    assert_eq!(classifier.classify("/admin/users/3"), PathClass::AdminOnly);
    assert_eq!(classifier.classify("/administrator"), PathClass::Protected);
}

#[test]
fn test_first_matching_rule_wins() {
    // A skip rule registered before a public rule for the same subtree wins.
    let classifier = PathClassifier::new()
        .skip(PathPattern::subtree("/assets"))
        .public(PathPattern::subtree("/assets"))
        .public(PathPattern::subtree("/admin/login"))
        .admin_only(PathPattern::subtree("/admin"));

    assert_eq!(classifier.classify("/assets/app.css"), PathClass::Skip);
    assert_eq!(classifier.classify("/admin/login"), PathClass::Public);
    assert_eq!(classifier.classify("/admin/settings"), PathClass::AdminOnly);
    assert_eq!(classifier.rules().len(), 4);
}

#[test]
fn test_empty_classifier_protects_everything() {
    let classifier = PathClassifier::new();

    assert_eq!(classifier.classify("/favicon.ico"), PathClass::Protected);
    assert_eq!(classifier.classify("/login"), PathClass::Protected);
}

#[test]
fn test_subtree_pattern_ignores_trailing_slash() {
    let pattern = PathPattern::subtree("/reports/");

    assert!(pattern.matches("/reports"));
    assert!(pattern.matches("/reports/2026/q1"));
    assert!(!pattern.matches("/reportsx"));
}

#[test]
fn test_exact_pattern_does_not_match_children() {
    let pattern = PathPattern::exact("/robots.txt");

    assert!(pattern.matches("/robots.txt"));
    assert!(!pattern.matches("/robots.txt/x"));
}

proptest! {
    #[test]
    fn prop_skip_subtrees_cover_all_sub_paths(
        root in prop::sample::select(SKIP_ROOTS),
        tail in "[a-zA-Z0-9._-]{1,12}(/[a-zA-Z0-9._-]{1,12}){0,3}",
    ) {
        let classifier = PathClassifier::crm_default();
        let path = format!("{root}/{tail}");
        prop_assert_eq!(classifier.classify(&path), PathClass::Skip);
    }

    #[test]
    fn prop_unlisted_top_level_paths_are_protected(segment in "[a-z]{1,10}") {
        let classifier = PathClassifier::crm_default();
        let listed = ["admin", "login", "static", "images", "icons"];
        prop_assume!(!listed.contains(&segment.as_str()));

        prop_assert_eq!(classifier.classify(&format!("/{segment}")), PathClass::Protected);
    }
}
