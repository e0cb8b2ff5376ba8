//! Member type DataLoader for batched fetching

use std::collections::HashMap;
use std::sync::Arc;

use super::batch::Fetch;
use super::LoaderError;
use crate::models::{MemberType, MemberTypeId};
use crate::repositories::Store;

/// Fetcher for member types by id
#[derive(Clone)]
pub struct MemberTypeLoader {
    store: Arc<dyn Store>,
}

impl MemberTypeLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<MemberTypeId> for MemberTypeLoader {
    type Value = MemberType;
    type Error = LoaderError;

    async fn fetch(
        &self,
        keys: &[MemberTypeId],
    ) -> Result<HashMap<MemberTypeId, Self::Value>, Self::Error> {
        let member_types = self
            .store
            .member_types_by_ids(keys)
            .await
            .map_err(Arc::new)?;
        Ok(member_types.into_iter().map(|m| (m.id, m)).collect())
    }
}
