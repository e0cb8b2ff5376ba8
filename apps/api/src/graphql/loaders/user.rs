//! User DataLoader for batched fetching
//!
//! This loader batches multiple user ID lookups into a single store read,
//! solving the N+1 problem when resolving authors of posts or owners of
//! profiles.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::batch::Fetch;
use super::LoaderError;
use crate::models::User;
use crate::repositories::Store;

/// Fetcher for users by id
#[derive(Clone)]
pub struct UserLoader {
    store: Arc<dyn Store>,
}

impl UserLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for UserLoader {
    type Value = User;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let users = self.store.users_by_ids(keys).await.map_err(Arc::new)?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
