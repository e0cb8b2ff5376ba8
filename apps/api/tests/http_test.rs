//! Integration tests for the HTTP surface
//!
//! Drives the assembled router with `tower::ServiceExt::oneshot`.

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use rstest::rstest;
use tower::ServiceExt;

use common::*;
use pulse_api::MemoryStore;

#[tokio::test]
async fn test_graphql_post_executes_query() {
    let seed = Seed::new();
    let app = test_router(&seed.store, false);

    let response = app
        .oneshot(graphql_post("{ users { name posts { title } } }"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["users"].as_array().unwrap().len(), 3);
    assert_eq!(seed.store.calls_to("posts_by_author_ids").len(), 1);
}

#[tokio::test]
async fn test_each_http_request_gets_fresh_loaders() {
    let seed = Seed::new();
    let app = test_router(&seed.store, false);
    let query = format!(r#"{{ user(id: "{}") {{ name }} }}"#, seed.alice.id);

    for _ in 0..2 {
        let response = app.clone().oneshot(graphql_post(&query)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(seed.store.calls_to("users_by_ids").len(), 2);
}

#[rstest]
#[case(true, StatusCode::OK)]
#[case(false, StatusCode::NOT_FOUND)]
#[tokio::test]
async fn test_graphiql_toggle(#[case] enabled: bool, #[case] expected: StatusCode) {
    let store = std::sync::Arc::new(MemoryStore::new());
    let app = test_router(&store, enabled);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/graphql")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_simple_health_check() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let app = test_router(&store, false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_liveness_probe() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let app = test_router(&store, false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "alive");
    assert!(json["version"].is_string());
}

#[rstest]
#[case(false, StatusCode::OK, "status", "healthy")]
#[case(true, StatusCode::SERVICE_UNAVAILABLE, "code", "SERVICE_UNAVAILABLE")]
#[tokio::test]
async fn test_readiness_probe(
    #[case] store_down: bool,
    #[case] expected_status: StatusCode,
    #[case] field: &str,
    #[case] expected: &str,
) {
    let store = std::sync::Arc::new(MemoryStore::new());
    if store_down {
        store.fail_operation("ping");
    }
    let app = test_router(&store, false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), expected_status);
    let json = body_json(response).await;
    assert_eq!(json[field], expected);
    if store_down {
        assert_eq!(json["message"], "store unreachable");
    }
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let app = test_router(&store, false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
