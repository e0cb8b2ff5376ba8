//! User queries for Pulse GraphQL API
//!
//! - user: Get a single user by ID
//! - users: List all users, preloading the subscription directions the
//!   selection set asks for

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::graphql::types::User;
use crate::models::RequestedRelations;

/// User-related queries
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let loaders = ctx.data::<Loaders>()?;
        let user = loaders.user.load_one(id).await?;
        Ok(user.map(User::from))
    }

    /// List all users
    ///
    /// Subscription edges are read in the same round-trip as the users, but
    /// only for the directions selected below this field.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = ctx.data::<Loaders>()?;
        let look_ahead = ctx.look_ahead();
        let relations = RequestedRelations {
            user_subscribed_to: look_ahead.field("userSubscribedTo").exists(),
            subscribed_to_user: look_ahead.field("subscribedToUser").exists(),
        };

        let users = loaders.users_with_relations(relations).await?;
        Ok(users.into_iter().map(User::from).collect())
    }
}
