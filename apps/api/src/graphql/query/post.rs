//! Post queries for Pulse GraphQL API

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::graphql::types::Post;

/// Post-related queries
#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Get a post by ID
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        let loaders = ctx.data::<Loaders>()?;
        let post = loaders.post.load_one(id).await?;
        Ok(post.map(Post::from))
    }

    /// List all posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let loaders = ctx.data::<Loaders>()?;
        let posts = loaders.all_posts().await?;
        Ok(posts.into_iter().map(Post::from).collect())
    }
}
