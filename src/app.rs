use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::handlers::{protected, public};
use crate::middleware::require_session;
use crate::state::SharedState;

/// The full HTTP surface
pub fn app(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.server);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Session required
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn public_routes() -> Router<SharedState> {
    Router::new()
        .route("/login", get(public::login_get).post(public::login_post))
        .route("/logout", post(public::logout_post))
        .route("/projects", get(public::public_list))
        .route("/projects/:id", get(public::public_detail))
}

fn protected_routes(state: SharedState) -> Router<SharedState> {
    use protected::projects;

    Router::new()
        .route("/app/projects", get(projects::list).post(projects::create))
        .route("/app/projects/:id", put(projects::update).delete(projects::remove))
        .route_layer(from_fn_with_state(state, require_session))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if !server.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root(State(state): State<SharedState>, headers: HeaderMap) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let principal = state.principal(&headers);

    let session = match &principal {
        Some(user) => json!({
            "signed_in": true,
            "email": user.email,
            "links": { "projects": "/app/projects", "logout": "/logout" }
        }),
        None => json!({
            "signed_in": false,
            "links": { "login": "/login" }
        }),
    };

    Json(json!({
        "success": true,
        "data": {
            "name": "Project Tracker",
            "version": version,
            "description": "Multi-tenant project tracking with public sharing",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/login, /logout (public)",
                "public": "/projects[/:id] (public)",
                "app": "/app/projects[/:id] (session required)",
            },
            "session": session,
        }
    }))
}

async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
