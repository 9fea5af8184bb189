//! End-to-end API tests: registration, services, send, and retrieval.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{build_server, create_service, register, send_message, test_config};

#[tokio::test]
async fn test_health_endpoint() {
    let server = build_server(&test_config(), true);
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_register_returns_session() {
    let server = build_server(&test_config(), true);

    let response = server
        .post("/api/register")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["account"], "alice");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let server = build_server(&test_config(), true);

    // Name below the default minimum of 5
    let response = server
        .post("/api/register")
        .json(&json!({ "username": "bob", "password": "secret1" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // Password without a digit
    let response = server
        .post("/api/register")
        .json(&json!({ "username": "alice", "password": "secret" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_duplicate_name_conflicts() {
    let server = build_server(&test_config(), true);
    register(&server, "alice", "secret1").await;

    let response = server
        .post("/api/register")
        .json(&json!({ "username": "alice", "password": "other2" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // First account's credential is unaffected
    let response = server
        .post("/api/login")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_create_service_requires_auth() {
    let server = build_server(&test_config(), true);

    let response = server
        .post("/api/services")
        .json(&json!({ "name": "alerts" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_services() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;

    create_service(&server, &token, "alerts").await;
    create_service(&server, &token, "backup-2").await;

    let response = server
        .get("/api/services")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let services = body["data"].as_array().unwrap();
    assert_eq!(services.len(), 2);
    // Insertion order
    assert_eq!(services[0]["name"], "alerts");
    assert_eq!(services[0]["link"], "/link/alerts/getmsg");
    assert_eq!(services[1]["name"], "backup-2");
}

#[tokio::test]
async fn test_service_name_rules() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;

    let response = server
        .post("/api/services")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "name": "bad name!" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_service_name_unique_across_accounts() {
    let server = build_server(&test_config(), true);
    let alice = register(&server, "alice", "secret1").await;
    let bob = register(&server, "bobby", "secret2").await;

    create_service(&server, &alice, "alerts").await;

    let response = server
        .post("/api/services")
        .add_header(AUTHORIZATION, format!("Bearer {}", bob))
        .json(&json!({ "name": "alerts" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_send_requires_ownership() {
    let server = build_server(&test_config(), true);
    let alice = register(&server, "alice", "secret1").await;
    let bob = register(&server, "bobby", "secret2").await;
    create_service(&server, &alice, "alerts").await;

    let response = server
        .post("/api/services/alerts")
        .add_header(AUTHORIZATION, format!("Bearer {}", bob))
        .json(&json!({ "message": "intrusion" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_send_to_unknown_service() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;

    let response = server
        .post("/api/services/ghost")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "message": "hello" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_then_getmsg_envelope() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;
    create_service(&server, &token, "alerts").await;
    send_message(&server, &token, "alerts", "hello").await;

    let response = server.get("/link/alerts/getmsg").await;
    response.assert_status_ok();
    response.assert_text("|| MENSAGEM || : hello");
}

#[tokio::test]
async fn test_getmsg_consumes_exactly_once() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;
    create_service(&server, &token, "alerts").await;
    send_message(&server, &token, "alerts", "hello").await;

    let first = server.get("/link/alerts/getmsg").await;
    first.assert_text("|| MENSAGEM || : hello");

    // Second retrieval waits out max_wait and comes back empty
    let second = server.get("/link/alerts/getmsg").await;
    second.assert_status_ok();
    second.assert_text("");
}

#[tokio::test]
async fn test_send_overwrites_unread_message() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;
    create_service(&server, &token, "alerts").await;

    send_message(&server, &token, "alerts", "first").await;
    send_message(&server, &token, "alerts", "second").await;

    let response = server.get("/link/alerts/getmsg").await;
    response.assert_text("|| MENSAGEM || : second");
}

#[tokio::test]
async fn test_getmsg_unknown_service_is_empty_and_fast() {
    let server = build_server(&test_config(), true);

    let start = Instant::now();
    let response = server.get("/link/ghost/getmsg").await;
    response.assert_status_ok();
    response.assert_text("");
    // No wait for a service that does not exist
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_getmsg_times_out_no_earlier_than_max_wait() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;
    create_service(&server, &token, "quiet").await;

    let start = Instant::now();
    let response = server.get("/link/quiet/getmsg").await;
    response.assert_text("");

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(1), "returned at {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "returned at {elapsed:?}");
}

#[tokio::test]
async fn test_send_wakes_parked_long_poll() {
    let server = Arc::new(build_server(&test_config(), true));
    let token = register(&server, "alice", "secret1").await;
    create_service(&server, &token, "alerts").await;

    // axum-test's request future is not `Send`, so the waiter task must run
    // on a `LocalSet` via `spawn_local` instead of `tokio::spawn`.
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let waiter = {
                let server = server.clone();
                tokio::task::spawn_local(async move {
                    let start = Instant::now();
                    let response = server.get("/link/alerts/getmsg").await;
                    (response.text(), start.elapsed())
                })
            };

            tokio::time::sleep(Duration::from_millis(200)).await;
            send_message(&server, &token, "alerts", "wakeup").await;

            let (body, elapsed) = waiter.await.unwrap();
            assert_eq!(body, "|| MENSAGEM || : wakeup");
            // Delivered well before the 1s bound
            assert!(
                elapsed < Duration::from_millis(900),
                "delivered at {elapsed:?}"
            );
        })
        .await;
}

#[tokio::test]
async fn test_empty_message_is_not_deliverable() {
    let server = build_server(&test_config(), true);
    let token = register(&server, "alice", "secret1").await;
    create_service(&server, &token, "alerts").await;

    send_message(&server, &token, "alerts", "pending").await;
    send_message(&server, &token, "alerts", "").await;

    let response = server.get("/link/alerts/getmsg").await;
    response.assert_text("");
}
