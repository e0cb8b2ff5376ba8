//! Post mutations for Pulse GraphQL API

use std::sync::Arc;

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use super::to_graphql_error;
use crate::graphql::types::Post;
use crate::models::{ChangePost, CreatePost};
use crate::repositories::Store;

/// Maximum length of a post title
const MAX_TITLE_LENGTH: usize = 255;

fn validate_title(title: &str) -> Result<()> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "Title cannot exceed {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

/// Input type for creating a post
#[derive(Debug, Clone, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl From<CreatePostInput> for CreatePost {
    fn from(input: CreatePostInput) -> Self {
        Self {
            author_id: input.author_id,
            title: input.title,
            content: input.content,
        }
    }
}

/// Input type for changing a post; omitted fields are left unchanged
#[derive(Debug, Clone, InputObject)]
pub struct ChangePostInput {
    pub author_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<ChangePostInput> for ChangePost {
    fn from(input: ChangePostInput) -> Self {
        Self {
            author_id: input.author_id,
            title: input.title,
            content: input.content,
        }
    }
}

/// Post mutations
#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a new post
    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostInput) -> Result<Post> {
        validate_title(&dto.title)?;
        let store = ctx.data::<Arc<dyn Store>>()?;
        let post = store
            .create_post(dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Post::from(post))
    }

    /// Change an existing post
    async fn change_post(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangePostInput,
    ) -> Result<Post> {
        if let Some(title) = &dto.title {
            validate_title(title)?;
        }
        let store = ctx.data::<Arc<dyn Store>>()?;
        let post = store
            .update_post(id, dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Post::from(post))
    }

    /// Delete a post
    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<String>> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        store.delete_post(id).await.map_err(to_graphql_error)?;
        Ok(None)
    }
}
