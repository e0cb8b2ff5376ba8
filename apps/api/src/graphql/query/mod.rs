//! GraphQL queries for Pulse
//!
//! This module contains all query resolvers, organized by domain. Reads
//! never touch the store directly; they go through the request's loaders.

mod post;
mod profile;
mod user;

pub use post::PostQuery;
pub use profile::ProfileQuery;
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(UserQuery, PostQuery, ProfileQuery);
