//! Router configuration for the msgdrop API.

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    captcha_check, create_service, getmsg, list_services, login, register, send_message, AppState,
};

/// Build the CORS layer from the configured origins. An empty list means
/// any origin: retrieval links are meant to be embedded anywhere.
fn create_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
    }
}

/// Create the main API router.
pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/login/captcha", get(captcha_check))
        .route("/services", post(create_service).get(list_services))
        .route("/services/:name", post(send_message));

    Router::new()
        .nest("/api", api_routes)
        .route("/link/:name/getmsg", get(getmsg))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
