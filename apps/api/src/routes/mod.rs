//! HTTP route handlers for the Pulse API
//!
//! - `POST /graphql` executes a GraphQL request with fresh loaders
//! - `GET /graphql` serves GraphiQL when enabled
//! - `/health`, `/health/live`, `/health/ready` for probes

pub mod graphql;
pub mod health;

pub use graphql::{graphql_router, GraphQLState};
pub use health::{health_router, HealthState};

use axum::Router;

/// Assemble the API router without transport layers
///
/// Tracing and CORS are added by the binary so tests can drive the bare
/// router with `tower::ServiceExt::oneshot`.
pub fn api_router(graphql: GraphQLState, health: HealthState) -> Router {
    Router::new()
        .nest("/graphql", graphql_router(graphql))
        .nest("/health", health_router(health))
}
