//! Test helper functions for API integration tests
//!
//! GraphQL requests are executed exactly as the HTTP handler does it: a
//! shared schema plus a fresh loader registry per request.

#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::Request;
use axum::{body::Body, http::Request as HttpRequest, response::Response, Router};
use pulse_api::graphql::{with_loaders, LoaderOptions};
use pulse_api::models::User;
use pulse_api::routes::{api_router, GraphQLState, HealthState};
use pulse_api::{build_schema, MemoryStore, Store};

/// Execute one GraphQL request against `store` with fresh loaders
pub async fn execute(store: &Arc<MemoryStore>, query: &str) -> async_graphql::Response {
    let store: Arc<dyn Store> = store.clone();
    let schema = build_schema(store.clone());
    let request = with_loaders(Request::new(query), store, LoaderOptions::default());
    schema.execute(request).await
}

/// Execute a request that must succeed and return its data as JSON
pub async fn execute_ok(store: &Arc<MemoryStore>, query: &str) -> serde_json::Value {
    let response = execute(store, query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

/// Operation names of the recorded store reads, in call order
pub fn operations(store: &MemoryStore) -> Vec<&'static str> {
    store.calls().iter().map(|call| call.operation).collect()
}

/// Sorted id strings for a set of users, matching the fetch log format
pub fn sorted_ids(users: &[&User]) -> Vec<String> {
    let mut ids: Vec<String> = users.iter().map(|u| u.id.to_string()).collect();
    ids.sort();
    ids
}

/// Sorted values of `field` across a JSON array of objects
pub fn sorted_field(items: &serde_json::Value, field: &str) -> Vec<String> {
    let mut values: Vec<String> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap().to_string())
        .collect();
    values.sort();
    values
}

/// Find the object in a JSON array whose `name` equals `name`
pub fn by_name<'a>(items: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    items
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["name"] == name)
        .unwrap_or_else(|| panic!("no item named {name}"))
}

/// Full API router over `store`, without transport layers
pub fn test_router(store: &Arc<MemoryStore>, enable_graphiql: bool) -> Router {
    let store: Arc<dyn Store> = store.clone();
    api_router(
        GraphQLState {
            schema: build_schema(store.clone()),
            store: store.clone(),
            loader_options: LoaderOptions::default(),
            enable_graphiql,
        },
        HealthState::new(store),
    )
}

/// POST a GraphQL query as JSON
pub fn graphql_post(query: &str) -> HttpRequest<Body> {
    HttpRequest::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "query": query }).to_string(),
        ))
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
