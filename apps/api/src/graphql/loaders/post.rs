//! Post DataLoader for batched fetching

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::batch::Fetch;
use super::LoaderError;
use crate::models::Post;
use crate::repositories::Store;

/// Fetcher for posts by id
#[derive(Clone)]
pub struct PostLoader {
    store: Arc<dyn Store>,
}

impl PostLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for PostLoader {
    type Value = Post;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let posts = self.store.posts_by_ids(keys).await.map_err(Arc::new)?;
        Ok(posts.into_iter().map(|p| (p.id, p)).collect())
    }
}
