//! GraphQL schema builder for Pulse
//!
//! The schema itself is shared by every request and only carries the
//! store used by mutations. Read-side loaders are request-scoped and are
//! attached with [`with_loaders`] before execution.

use std::sync::Arc;

use async_graphql::{EmptySubscription, Request, Schema};

use super::loaders::{LoaderOptions, Loaders};
use super::mutation::Mutation;
use super::query::Query;
use crate::repositories::Store;

/// The Pulse GraphQL schema type
pub type PulseSchema = Schema<Query, Mutation, EmptySubscription>;

/// Default maximum query depth
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Builder for constructing the GraphQL schema
pub struct SchemaBuilder {
    store: Arc<dyn Store>,
    max_depth: usize,
}

impl SchemaBuilder {
    /// Create a new schema builder over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum query depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the schema
    pub fn build(self) -> PulseSchema {
        Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(self.store)
            .limit_depth(self.max_depth)
            .finish()
    }
}

/// Create a new GraphQL schema with the default depth limit
pub fn build_schema(store: Arc<dyn Store>) -> PulseSchema {
    SchemaBuilder::new(store).build()
}

/// Attach a fresh loader registry to a request
///
/// Must be called once per request so caches never outlive it.
pub fn with_loaders(request: Request, store: Arc<dyn Store>, options: LoaderOptions) -> Request {
    request.data(Loaders::with_options(store, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    #[test]
    fn test_schema_builder_default_depth() {
        let builder = SchemaBuilder::new(Arc::new(MemoryStore::new()));
        assert_eq!(builder.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_sdl_exposes_lowercase_member_type_ids() {
        let schema = build_schema(Arc::new(MemoryStore::new()));
        let sdl = schema.sdl();
        assert!(sdl.contains("enum MemberTypeId"));
        assert!(sdl.contains("basic"));
        assert!(sdl.contains("business"));
        assert!(sdl.contains("subscribedToUser: [User!]!"));
    }

    #[tokio::test]
    async fn test_query_depth_is_limited() {
        let schema = SchemaBuilder::new(Arc::new(MemoryStore::new()))
            .max_depth(2)
            .build();
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let request = with_loaders(
            Request::new("{ users { posts { author { id } } } }"),
            store,
            LoaderOptions::default(),
        );

        let response = schema.execute(request).await;

        assert!(!response.errors.is_empty());
    }
}
