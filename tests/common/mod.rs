//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};

use msgdrop::captcha::StaticVerifier;
use msgdrop::web::handlers::AppState;
use msgdrop::web::router::{create_health_router, create_router};
use msgdrop::{Config, MemoryStore};

/// Configuration for tests: short long-poll bound, memory store.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.poll.max_wait_secs = 1;
    config.poll.interval_ms = 50;
    config
}

/// Build a test server over a fresh memory store.
///
/// `captcha_ok` is the fixed answer of the CAPTCHA verifier.
pub fn build_server(config: &Config, captcha_ok: bool) -> TestServer {
    let state = Arc::new(
        AppState::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(StaticVerifier(captcha_ok)),
        )
        .expect("failed to build app state"),
    );

    let router = create_router(state, &[]).merge(create_health_router());
    TestServer::new(router).expect("failed to create test server")
}

/// Register an account and return the session token.
pub async fn register(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/api/register")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Create a service under the given session token.
pub async fn create_service(server: &TestServer, token: &str, name: &str) {
    let response = server
        .post("/api/services")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "name": name }))
        .await;
    response.assert_status_ok();
}

/// Send a message to a service under the given session token.
pub async fn send_message(server: &TestServer, token: &str, service: &str, message: &str) {
    let response = server
        .post(&format!("/api/services/{service}"))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "message": message }))
        .await;
    response.assert_status_ok();
}
