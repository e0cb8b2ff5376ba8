//! User mutations for Pulse GraphQL API
//!
//! - createUser / changeUser / deleteUser
//! - subscribeTo: Follow an author
//! - unsubscribeFrom: Stop following an author

use std::sync::Arc;

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use super::to_graphql_error;
use crate::graphql::types::User;
use crate::models::{ChangeUser, CreateUser, SubscriptionEdge};
use crate::repositories::{Store, StoreError};

/// Maximum length of a user name
const MAX_NAME_LENGTH: usize = 255;

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(async_graphql::Error::new("Name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "Name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Input type for creating a user
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    #[graphql(default = 0.0)]
    pub balance: f64,
}

impl From<CreateUserInput> for CreateUser {
    fn from(input: CreateUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

/// Input type for changing a user; omitted fields are left unchanged
#[derive(Debug, Clone, InputObject)]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl From<ChangeUserInput> for ChangeUser {
    fn from(input: ChangeUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

/// User mutations
#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create a new user
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserInput) -> Result<User> {
        validate_name(&dto.name)?;
        let store = ctx.data::<Arc<dyn Store>>()?;
        let user = store
            .create_user(dto.into())
            .await
            .map_err(to_graphql_error)?;
        tracing::info!(user_id = %user.id, "Created user");
        Ok(User::from(user))
    }

    /// Change an existing user
    async fn change_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeUserInput,
    ) -> Result<User> {
        if let Some(name) = &dto.name {
            validate_name(name)?;
        }
        let store = ctx.data::<Arc<dyn Store>>()?;
        let user = store
            .update_user(id, dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(User::from(user))
    }

    /// Delete a user together with its posts, profile and subscriptions
    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<String>> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        store.delete_user(id).await.map_err(to_graphql_error)?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(None)
    }

    /// Subscribe `user_id` to `author_id`, returning the subscriber
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<User> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        store
            .subscribe(SubscriptionEdge {
                subscriber_id: user_id,
                author_id,
            })
            .await
            .map_err(to_graphql_error)?;

        let user = store
            .users_by_ids(&[user_id])
            .await
            .map_err(to_graphql_error)?
            .into_iter()
            .next()
            .ok_or_else(|| to_graphql_error(StoreError::not_found("user", user_id)))?;
        Ok(User::from(user))
    }

    /// Remove the subscription of `user_id` to `author_id`
    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<String>> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        store
            .unsubscribe(SubscriptionEdge {
                subscriber_id: user_id,
                author_id,
            })
            .await
            .map_err(to_graphql_error)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada", true)]
    #[case("", false)]
    #[case("   ", false)]
    fn test_validate_name(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(validate_name(name).is_ok(), valid);
    }

    #[test]
    fn test_validate_name_rejects_long_names() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&name).is_err());
    }
}
