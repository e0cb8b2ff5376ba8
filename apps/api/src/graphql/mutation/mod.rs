//! GraphQL mutations for Pulse
//!
//! This module contains all mutation resolvers, organized by domain.
//! Writes go straight to the schema-level [`Store`]; they never read from
//! or populate the request's loaders.

mod post;
mod profile;
mod user;

pub use post::{ChangePostInput, CreatePostInput, PostMutation};
pub use profile::{ChangeProfileInput, CreateProfileInput, ProfileMutation};
pub use user::{ChangeUserInput, CreateUserInput, UserMutation};

use async_graphql::MergedObject;

use crate::repositories::StoreError;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, PostMutation, ProfileMutation);

/// Convert store errors to GraphQL errors with appropriate messages
///
/// Not-found and constraint failures are caused by the request and are
/// reported as such; anything else is logged and masked.
fn to_graphql_error(error: StoreError) -> async_graphql::Error {
    match &error {
        StoreError::NotFound { entity, .. } => {
            async_graphql::Error::new(format!("{} not found", entity))
        }
        StoreError::Constraint(msg) => async_graphql::Error::new(msg.clone()),
        _ if error.is_constraint_violation() => async_graphql::Error::new(
            "Request conflicts with existing data or references a missing record",
        ),
        _ => {
            tracing::error!(error = %error, "Mutation error");
            async_graphql::Error::new("An unexpected error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_entity() {
        let error = to_graphql_error(StoreError::not_found("post", "abc"));
        assert_eq!(error.message, "post not found");
    }

    #[test]
    fn test_constraint_message_is_kept() {
        let error = to_graphql_error(StoreError::Constraint(
            "user already has a profile".to_string(),
        ));
        assert_eq!(error.message, "user already has a profile");
    }

    #[test]
    fn test_unavailable_is_masked() {
        let error = to_graphql_error(StoreError::Unavailable("pool closed".to_string()));
        assert_eq!(error.message, "An unexpected error occurred");
    }
}
