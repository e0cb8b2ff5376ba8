//! Subscription graph DataLoaders
//!
//! Each direction is one joined read: the store follows the edges for all
//! requested users and returns the full user row on the far end, so no
//! second by-id batch is needed per level of nesting.
//!
//! - [`UserSubscribedToLoader`]: authors each requested user follows
//! - [`SubscribedToUserLoader`]: users following each requested user

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::batch::Fetch;
use super::LoaderError;
use crate::models::{LinkedUser, User};
use crate::repositories::Store;

/// Group far-end users by the requested id; every key gets an entry
fn group_linked(keys: &[Uuid], rows: Vec<LinkedUser>) -> HashMap<Uuid, Vec<User>> {
    let mut result: HashMap<Uuid, Vec<User>> = HashMap::new();
    for row in rows {
        result.entry(row.linked_id).or_default().push(row.user);
    }
    for key in keys {
        result.entry(*key).or_default();
    }
    result
}

/// Fetcher for the authors each user subscribed to
#[derive(Clone)]
pub struct UserSubscribedToLoader {
    store: Arc<dyn Store>,
}

impl UserSubscribedToLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for UserSubscribedToLoader {
    type Value = Vec<User>;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let rows = self
            .store
            .authors_followed_by(keys)
            .await
            .map_err(Arc::new)?;
        Ok(group_linked(keys, rows))
    }
}

/// Fetcher for the subscribers of each user
#[derive(Clone)]
pub struct SubscribedToUserLoader {
    store: Arc<dyn Store>,
}

impl SubscribedToUserLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Fetch<Uuid> for SubscribedToUserLoader {
    type Value = Vec<User>;
    type Error = LoaderError;

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let rows = self.store.subscribers_of(keys).await.map_err(Arc::new)?;
        Ok(group_linked(keys, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            balance: 0.0,
        }
    }

    #[test]
    fn test_group_linked_fills_missing_keys() {
        let alice = user("alice");
        let bob = user("bob");
        let lonely = Uuid::new_v4();

        let grouped = group_linked(
            &[alice.id, lonely],
            vec![LinkedUser {
                linked_id: alice.id,
                user: bob.clone(),
            }],
        );

        assert_eq!(grouped[&alice.id], vec![bob]);
        assert!(grouped[&lonely].is_empty());
    }
}
