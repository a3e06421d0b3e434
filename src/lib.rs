use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// The authorization boundary: token codec, path classifier, request gate.
pub mod session;
pub mod paths;
pub mod gate;
pub mod cookie;
pub mod auth;

// Login flow and HTTP surface.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use auth::GateState;
pub use config::AppConfig;
pub use gate::{AccessDecision, Gate, GatePolicy, Verdict};
pub use paths::{PathClass, PathClassifier, PathPattern};
pub use repository::{PostgresRepository, RepositoryState};
pub use session::{SessionClaims, SessionCodec, SessionError};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::login, handlers::logout, handlers::health, handlers::me),
    components(
        schemas(
            models::LoginRequest, models::LoginResponse, models::LogoutResponse,
            models::SessionUser, models::MeResponse, models::HealthResponse,
            models::ErrorBody,
        )
    ),
    tags(
        (name = "crm-gateway", description = "CRM session and access gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, cloneable container of everything handlers and middleware need.
#[derive(Clone)]
pub struct AppState {
    /// Account lookup for the login flow.
    pub repo: RepositoryState,
    /// The loaded configuration.
    pub config: AppConfig,
    /// The request gate, built once from the configuration.
    pub gate: GateState,
}

impl AppState {
    /// new
    ///
    /// Builds the gate from `config`: the CRM path rules, the default policy and
    /// a codec keyed with the configured secret.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let codec = SessionCodec::new(config.session_secret.as_bytes(), config.session_ttl());
        let gate = Gate::new(PathClassifier::crm_default(), codec, GatePolicy::default());

        Self {
            repo,
            config,
            gate: Arc::new(gate),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for GateState {
    fn from_ref(app_state: &AppState) -> GateState {
        app_state.gate.clone()
    }
}

/// create_router
///
/// Assembles the routes, puts every one of them behind the gate, and adds the
/// observability stack around it.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .nest("/admin", admin::admin_routes())
        // The gate wraps every route above, including the 404 fallback, so
        // unknown paths are classified like any other.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::gate_middleware,
        ))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`: method, URI and the `x-request-id` set above, so every
/// log line of a request, gate decisions included, is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
