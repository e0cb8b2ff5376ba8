//! Request-scoped DataLoaders for GraphQL
//!
//! Every GraphQL request gets a fresh [`Loaders`] registry so that cached
//! rows never leak between requests. Each loader batches the keys requested
//! by sibling resolvers into a single store read.
//!
//! There are two types of loaders:
//! - Single-entity loaders: Return `Option<T>` for a single entity by key
//! - Collection loaders: Return `Vec<T>` for related entities by parent ID
//!
//! The bulk user read in [`Loaders::users_with_relations`] also primes the
//! subscription loaders, so nested `userSubscribedTo` / `subscribedToUser`
//! selections under a `users` list need no further reads.

mod batch;
mod member_type;
mod post;
mod posts_by_author;
mod profile;
mod subscriptions;
mod user;

pub use batch::{BatchLoader, Fetch, LoadError, LoaderOptions, DEFAULT_BATCH_DELAY_MS};
pub use member_type::MemberTypeLoader;
pub use post::PostLoader;
pub use posts_by_author::PostsByAuthorLoader;
pub use profile::{ProfileByUserLoader, ProfileLoader};
pub use subscriptions::{SubscribedToUserLoader, UserSubscribedToLoader};
pub use user::UserLoader;

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::{MemberType, MemberTypeId, Post, Profile, RequestedRelations, User};
use crate::repositories::{Store, StoreError};

/// Error shared by every caller of a failed batch
pub type LoaderError = Arc<StoreError>;

/// Container for all DataLoader instances of one request
pub struct Loaders {
    pub user: BatchLoader<Uuid, UserLoader>,
    pub post: BatchLoader<Uuid, PostLoader>,
    pub profile: BatchLoader<Uuid, ProfileLoader>,
    pub member_type: BatchLoader<MemberTypeId, MemberTypeLoader>,
    pub posts_by_author: BatchLoader<Uuid, PostsByAuthorLoader>,
    pub profile_by_user: BatchLoader<Uuid, ProfileByUserLoader>,
    pub user_subscribed_to: BatchLoader<Uuid, UserSubscribedToLoader>,
    pub subscribed_to_user: BatchLoader<Uuid, SubscribedToUserLoader>,
    store: Arc<dyn Store>,
}

impl Loaders {
    /// Create a registry with default loader options
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_options(store, LoaderOptions::default())
    }

    /// Create a registry with the same options applied to every loader
    pub fn with_options(store: Arc<dyn Store>, options: LoaderOptions) -> Self {
        Self {
            user: BatchLoader::with_options("user", UserLoader::new(store.clone()), options),
            post: BatchLoader::with_options("post", PostLoader::new(store.clone()), options),
            profile: BatchLoader::with_options(
                "profile",
                ProfileLoader::new(store.clone()),
                options,
            ),
            member_type: BatchLoader::with_options(
                "member_type",
                MemberTypeLoader::new(store.clone()),
                options,
            ),
            posts_by_author: BatchLoader::with_options(
                "posts_by_author",
                PostsByAuthorLoader::new(store.clone()),
                options,
            ),
            profile_by_user: BatchLoader::with_options(
                "profile_by_user",
                ProfileByUserLoader::new(store.clone()),
                options,
            ),
            user_subscribed_to: BatchLoader::with_options(
                "user_subscribed_to",
                UserSubscribedToLoader::new(store.clone()),
                options,
            ),
            subscribed_to_user: BatchLoader::with_options(
                "subscribed_to_user",
                SubscribedToUserLoader::new(store.clone()),
                options,
            ),
            store,
        }
    }

    /// Load every user, reading subscription edges only for the requested
    /// directions, in a single store call
    ///
    /// Each requested direction is primed for every returned user, and the
    /// by-id user loader is primed with every row.
    pub async fn users_with_relations(
        &self,
        relations: RequestedRelations,
    ) -> Result<Vec<User>, LoaderError> {
        let rows = self
            .store
            .users_with_subscriptions(relations)
            .await
            .map_err(Arc::new)?;

        let by_id: HashMap<Uuid, &User> = rows.iter().map(|row| (row.user.id, &row.user)).collect();
        let resolve = |ids: &[Uuid]| -> Vec<User> {
            ids.iter()
                .filter_map(|id| by_id.get(id).map(|user| (*user).clone()))
                .collect()
        };

        for row in &rows {
            if relations.user_subscribed_to {
                self.user_subscribed_to
                    .prime(row.user.id, resolve(&row.user_subscribed_to_ids));
            }
            if relations.subscribed_to_user {
                self.subscribed_to_user
                    .prime(row.user.id, resolve(&row.subscribed_to_user_ids));
            }
            self.user.prime(row.user.id, row.user.clone());
        }

        tracing::debug!(
            users = rows.len(),
            ?relations,
            "Primed loaders from bulk user read"
        );

        Ok(rows.into_iter().map(|row| row.user).collect())
    }

    /// Load every post and prime the by-id post loader
    pub async fn all_posts(&self) -> Result<Vec<Post>, LoaderError> {
        let posts = self.store.all_posts().await.map_err(Arc::new)?;
        for post in &posts {
            self.post.prime(post.id, post.clone());
        }
        Ok(posts)
    }

    /// Load every profile and prime both profile loaders
    pub async fn all_profiles(&self) -> Result<Vec<Profile>, LoaderError> {
        let profiles = self.store.all_profiles().await.map_err(Arc::new)?;
        for profile in &profiles {
            self.profile.prime(profile.id, profile.clone());
            self.profile_by_user.prime(profile.user_id, profile.clone());
        }
        Ok(profiles)
    }

    /// Load every member type and prime the by-id member type loader
    pub async fn all_member_types(&self) -> Result<Vec<MemberType>, LoaderError> {
        let member_types = self.store.all_member_types().await.map_err(Arc::new)?;
        for member_type in &member_types {
            self.member_type.prime(member_type.id, member_type.clone());
        }
        Ok(member_types)
    }

    /// Total number of batch fetches dispatched by this registry
    pub fn dispatch_count(&self) -> usize {
        self.user.dispatch_count()
            + self.post.dispatch_count()
            + self.profile.dispatch_count()
            + self.member_type.dispatch_count()
            + self.posts_by_author.dispatch_count()
            + self.profile_by_user.dispatch_count()
            + self.user_subscribed_to.dispatch_count()
            + self.subscribed_to_user.dispatch_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn seeded() -> (Arc<MemoryStore>, User, User, User) {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice", 10.0);
        let bob = store.insert_user("bob", 20.0);
        let carol = store.insert_user("carol", 30.0);
        // bob and carol follow alice, alice follows carol
        store.insert_subscription(bob.id, alice.id);
        store.insert_subscription(carol.id, alice.id);
        store.insert_subscription(alice.id, carol.id);
        (store, alice, bob, carol)
    }

    fn names(users: &[User]) -> Vec<String> {
        let mut names: Vec<String> = users.iter().map(|u| u.name.clone()).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_users_with_relations_primes_subscribers() {
        let (store, alice, bob, carol) = seeded();
        let loaders = Loaders::new(store.clone());

        let users = loaders
            .users_with_relations(RequestedRelations {
                user_subscribed_to: false,
                subscribed_to_user: true,
            })
            .await
            .unwrap();
        assert_eq!(users.len(), 3);

        store.clear_calls();
        let subscribers = loaders
            .subscribed_to_user
            .load_many([alice.id, bob.id, carol.id])
            .await
            .unwrap();

        assert_eq!(
            names(subscribers[0].as_deref().unwrap()),
            vec!["bob", "carol"]
        );
        assert!(subscribers[1].as_ref().unwrap().is_empty());
        assert_eq!(names(subscribers[2].as_deref().unwrap()), vec!["alice"]);
        assert_eq!(store.fetch_count(), 0);
        assert_eq!(loaders.subscribed_to_user.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn test_users_with_relations_leaves_unrequested_direction_unprimed() {
        let (store, alice, _bob, carol) = seeded();
        let loaders = Loaders::new(store.clone());

        loaders
            .users_with_relations(RequestedRelations {
                user_subscribed_to: false,
                subscribed_to_user: true,
            })
            .await
            .unwrap();
        store.clear_calls();

        let followed = loaders.user_subscribed_to.load_one(alice.id).await.unwrap();

        assert_eq!(followed.unwrap(), vec![carol]);
        assert_eq!(store.calls_to("authors_followed_by").len(), 1);
    }

    #[tokio::test]
    async fn test_users_with_relations_primes_user_by_id() {
        let (store, alice, _bob, _carol) = seeded();
        let loaders = Loaders::new(store.clone());

        loaders
            .users_with_relations(RequestedRelations::default())
            .await
            .unwrap();
        store.clear_calls();

        let loaded = loaders.user.load_one(alice.id).await.unwrap();

        assert_eq!(loaded, Some(alice));
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_all_profiles_primes_profile_by_user() {
        let (store, alice, _bob, _carol) = seeded();
        let profile = store.insert_profile(alice.id, MemberTypeId::Business, true, 1990);
        let loaders = Loaders::new(store.clone());

        loaders.all_profiles().await.unwrap();
        store.clear_calls();

        let by_user = loaders.profile_by_user.load_one(alice.id).await.unwrap();
        let by_id = loaders.profile.load_one(profile.id).await.unwrap();

        assert_eq!(by_user, Some(profile.clone()));
        assert_eq!(by_id, Some(profile));
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_registries_do_not_share_cache() {
        let (store, alice, _bob, _carol) = seeded();
        let first = Loaders::new(store.clone());
        let second = Loaders::new(store.clone());

        first.user.load_one(alice.id).await.unwrap();
        second.user.load_one(alice.id).await.unwrap();

        assert_eq!(store.calls_to("users_by_ids").len(), 2);
        assert_eq!(first.dispatch_count(), 1);
        assert_eq!(second.dispatch_count(), 1);
    }

    #[tokio::test]
    async fn test_bulk_read_failure_is_reported() {
        let (store, _alice, _bob, _carol) = seeded();
        store.fail_operation("users_with_subscriptions");
        let loaders = Loaders::new(store.clone());

        let result = loaders.users_with_relations(RequestedRelations::all()).await;

        assert!(result.is_err());
    }
}
