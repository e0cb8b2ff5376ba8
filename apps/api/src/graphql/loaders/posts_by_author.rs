//! Posts-by-Author DataLoader for batched fetching
//!
//! This loader batches multiple author ID lookups into a single foreign key
//! read and groups the rows by author. Every requested author gets an entry,
//! so an author without posts resolves to an empty list rather than absent.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::batch::Fetch;
use super::LoaderError;
use crate::models::Post;
use crate::repositories::Store;

/// Fetcher for the posts of each author
#[derive(Clone)]
pub struct PostsByAuthorLoader {
    store: Arc<dyn Store>,
}

impl PostsByAuthorLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for PostsByAuthorLoader {
    type Value = Vec<Post>;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let posts = self
            .store
            .posts_by_author_ids(keys)
            .await
            .map_err(Arc::new)?;

        // Group posts by author_id
        let mut result: HashMap<Uuid, Vec<Post>> = HashMap::new();
        for post in posts {
            result.entry(post.author_id).or_default().push(post);
        }

        // Ensure all requested keys have an entry (even if empty)
        for key in keys {
            result.entry(*key).or_default();
        }

        Ok(result)
    }
}
