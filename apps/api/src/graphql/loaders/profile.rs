//! Profile DataLoaders for batched fetching
//!
//! Two shapes over the same table: by profile id, and by owning user id.
//! A user has at most one profile, so both resolve to a single optional row.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::batch::Fetch;
use super::LoaderError;
use crate::models::Profile;
use crate::repositories::Store;

/// Fetcher for profiles by id
#[derive(Clone)]
pub struct ProfileLoader {
    store: Arc<dyn Store>,
}

impl ProfileLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for ProfileLoader {
    type Value = Profile;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let profiles = self.store.profiles_by_ids(keys).await.map_err(Arc::new)?;
        Ok(profiles.into_iter().map(|p| (p.id, p)).collect())
    }
}

/// Fetcher for the profile owned by each user
#[derive(Clone)]
pub struct ProfileByUserLoader {
    store: Arc<dyn Store>,
}

impl ProfileByUserLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for ProfileByUserLoader {
    type Value = Profile;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let profiles = self
            .store
            .profiles_by_user_ids(keys)
            .await
            .map_err(Arc::new)?;
        Ok(profiles.into_iter().map(|p| (p.user_id, p)).collect())
    }
}
