//! Post GraphQL type

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::models::Post as DbPost;

use super::user::User;

/// Post information exposed via GraphQL
pub struct Post {
    inner: DbPost,
}

impl Post {
    /// Create a new GraphQL Post from a database Post
    pub fn new(post: DbPost) -> Self {
        Self { inner: post }
    }
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self::new(post)
    }
}

#[Object]
impl Post {
    /// Unique post identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Post title
    async fn title(&self) -> &str {
        &self.inner.title
    }

    /// Post body
    async fn content(&self) -> &str {
        &self.inner.content
    }

    /// Author ID
    async fn author_id(&self) -> Uuid {
        self.inner.author_id
    }

    // Relationship resolvers

    /// Author of this post (uses DataLoader for batched fetching)
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loaders = ctx.data::<Loaders>()?;
        let user = loaders.user.load_one(self.inner.author_id).await?;
        Ok(user.map(User::from))
    }
}
