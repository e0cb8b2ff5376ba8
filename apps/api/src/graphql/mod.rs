//! GraphQL schema and resolvers for Pulse
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for users, posts, profiles and member types
//! - Mutation resolvers for writes and subscription edges
//! - Type definitions for all GraphQL objects
//! - Request-scoped batch loaders backing every relation

pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use loaders::{LoaderOptions, Loaders};
pub use schema::{build_schema, with_loaders, PulseSchema, SchemaBuilder};
