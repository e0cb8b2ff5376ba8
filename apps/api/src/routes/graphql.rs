//! GraphQL HTTP route handlers

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html, routing::get, Router};

use crate::error::{ApiError, ApiResult};
use crate::graphql::{with_loaders, LoaderOptions, PulseSchema};
use crate::repositories::Store;

/// Shared state for the GraphQL endpoint
#[derive(Clone)]
pub struct GraphQLState {
    /// Schema shared by all requests
    pub schema: PulseSchema,
    /// Store the per-request loaders read from
    pub store: Arc<dyn Store>,
    /// Options applied to every request's loaders
    pub loader_options: LoaderOptions,
    /// Serve GraphiQL on `GET /graphql`
    pub enable_graphiql: bool,
}

/// Create GraphQL router
pub fn graphql_router(state: GraphQLState) -> Router {
    Router::new()
        .route("/", get(graphiql).post(graphql_handler))
        .with_state(state)
}

/// Execute a GraphQL request
///
/// Every request gets its own loader registry, so cached rows never outlive
/// the request that read them.
async fn graphql_handler(
    State(state): State<GraphQLState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = with_loaders(req.into_inner(), state.store.clone(), state.loader_options);
    state.schema.execute(request).await.into()
}

/// GraphiQL IDE for development
async fn graphiql(State(state): State<GraphQLState>) -> ApiResult<Html<String>> {
    if !state.enable_graphiql {
        return Err(ApiError::not_found("route", "GET /graphql"));
    }
    Ok(Html(GraphiQLSource::build().endpoint("/graphql").finish()))
}
