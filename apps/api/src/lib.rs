//! Pulse API library
//!
//! A GraphQL API over users, posts, profiles, member types and the
//! subscription graph between users. Reads go through request-scoped batch
//! loaders that collapse nested resolver calls into one store read per
//! entity type and tick.
//!
//! This module exposes the core API components for use in integration tests
//! and by the server binary.

pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repositories;
pub mod routes;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use graphql::{build_schema, Loaders, PulseSchema, SchemaBuilder};
pub use repositories::{MemoryStore, PgStore, Store, StoreError};
