//! User GraphQL type
//!
//! This module defines the GraphQL type for users with relationship
//! resolvers. Every relation goes through the request's [`Loaders`], so
//! resolving the same relation for many users costs one batched read.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::models::User as DbUser;

use super::post::Post;
use super::profile::Profile;

/// User information exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl User {
    /// Create a new GraphQL User from a database User
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Unique user identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Display name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Account balance
    async fn balance(&self) -> f64 {
        self.inner.balance
    }

    // Relationship resolvers

    /// Profile of this user, if one exists (batched by user id)
    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        let loaders = ctx.data::<Loaders>()?;
        let profile = loaders.profile_by_user.load_one(self.inner.id).await?;
        Ok(profile.map(Profile::from))
    }

    /// Posts written by this user (batched by author id)
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let loaders = ctx.data::<Loaders>()?;
        let posts = loaders.posts_by_author.load_one(self.inner.id).await?;
        Ok(posts
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect())
    }

    /// Authors this user is subscribed to
    ///
    /// Served from the primed cache when the parent list came from `users`.
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = ctx.data::<Loaders>()?;
        let users = loaders.user_subscribed_to.load_one(self.inner.id).await?;
        Ok(users
            .unwrap_or_default()
            .into_iter()
            .map(User::from)
            .collect())
    }

    /// Users subscribed to this user
    ///
    /// Served from the primed cache when the parent list came from `users`.
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = ctx.data::<Loaders>()?;
        let users = loaders.subscribed_to_user.load_one(self.inner.id).await?;
        Ok(users
            .unwrap_or_default()
            .into_iter()
            .map(User::from)
            .collect())
    }
}
