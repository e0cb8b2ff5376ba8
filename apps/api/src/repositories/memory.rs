//! In-memory implementation of the [`Store`] contract
//!
//! Tables live behind a mutex and every read is appended to a fetch log, so
//! tests can assert exactly which bulk reads a GraphQL request performed.
//! Individual operations can be switched to fail to exercise error paths.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile, CreateUser, LinkedUser,
    MemberType, MemberTypeId, Post, Profile, RequestedRelations, SubscriptionEdge, User,
    UserWithSubscriptions,
};

/// One recorded read against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    /// Name of the [`Store`] method
    pub operation: &'static str,

    /// Keys passed to the read, sorted; empty for unfiltered reads
    pub keys: Vec<String>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    profiles: Vec<Profile>,
    member_types: Vec<MemberType>,
    subscriptions: Vec<SubscriptionEdge>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

/// Store holding all rows in process memory
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<FetchCall>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store seeded with the standard member types
    pub fn new() -> Self {
        let tables = Tables {
            member_types: vec![
                MemberType {
                    id: MemberTypeId::Basic,
                    discount: 4.2,
                    posts_limit_per_month: 20,
                },
                MemberType {
                    id: MemberTypeId::Business,
                    discount: 7.75,
                    posts_limit_per_month: 100,
                },
            ],
            ..Tables::default()
        };
        Self {
            tables: Mutex::new(tables),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    // ==================== Fixtures ====================

    /// Insert a user row directly, bypassing the fetch log
    pub fn insert_user(&self, name: &str, balance: f64) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            balance,
        };
        self.tables().users.push(user.clone());
        user
    }

    /// Insert a post row directly, bypassing the fetch log
    pub fn insert_post(&self, author_id: Uuid, title: &str, content: &str) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
        };
        self.tables().posts.push(post.clone());
        post
    }

    /// Insert a profile row directly, bypassing the fetch log
    pub fn insert_profile(
        &self,
        user_id: Uuid,
        member_type_id: MemberTypeId,
        is_male: bool,
        year_of_birth: i32,
    ) -> Profile {
        let profile = Profile {
            id: Uuid::new_v4(),
            is_male,
            year_of_birth,
            member_type_id,
            user_id,
        };
        self.tables().profiles.push(profile.clone());
        profile
    }

    /// Insert a `subscriber_id -> author_id` edge directly
    pub fn insert_subscription(&self, subscriber_id: Uuid, author_id: Uuid) {
        self.tables().subscriptions.push(SubscriptionEdge {
            subscriber_id,
            author_id,
        });
    }

    // ==================== Fetch log ====================

    /// Every read recorded so far, in call order
    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reads recorded for one operation
    pub fn calls_to(&self, operation: &str) -> Vec<FetchCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation == operation)
            .collect()
    }

    /// Total number of reads recorded
    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Forget recorded reads
    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Make every subsequent call to `operation` fail with `Unavailable`
    pub fn fail_operation(&self, operation: &'static str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation);
    }

    /// Undo [`MemoryStore::fail_operation`]
    pub fn restore_operation(&self, operation: &'static str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(operation);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record<K: ToString>(&self, operation: &'static str, keys: &[K]) -> StoreResult<()> {
        let mut keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
        keys.sort();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FetchCall { operation, keys });

        self.check_available(operation)
    }

    fn check_available(&self, operation: &'static str) -> StoreResult<()> {
        let failing = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing.contains(operation) {
            return Err(StoreError::Unavailable(format!(
                "{} is switched off",
                operation
            )));
        }
        Ok(())
    }
}

const NO_KEYS: &[&str] = &[];

#[async_trait]
impl Store for MemoryStore {
    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        self.record("users_by_ids", ids)?;
        Ok(self
            .tables()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn users_with_subscriptions(
        &self,
        relations: RequestedRelations,
    ) -> StoreResult<Vec<UserWithSubscriptions>> {
        self.record("users_with_subscriptions", NO_KEYS)?;
        let tables = self.tables();
        Ok(tables
            .users
            .iter()
            .map(|user| {
                let user_subscribed_to_ids = if relations.user_subscribed_to {
                    tables
                        .subscriptions
                        .iter()
                        .filter(|edge| edge.subscriber_id == user.id)
                        .map(|edge| edge.author_id)
                        .collect()
                } else {
                    Vec::new()
                };
                let subscribed_to_user_ids = if relations.subscribed_to_user {
                    tables
                        .subscriptions
                        .iter()
                        .filter(|edge| edge.author_id == user.id)
                        .map(|edge| edge.subscriber_id)
                        .collect()
                } else {
                    Vec::new()
                };
                UserWithSubscriptions {
                    user: user.clone(),
                    user_subscribed_to_ids,
                    subscribed_to_user_ids,
                }
            })
            .collect())
    }

    async fn authors_followed_by(&self, subscriber_ids: &[Uuid]) -> StoreResult<Vec<LinkedUser>> {
        self.record("authors_followed_by", subscriber_ids)?;
        let tables = self.tables();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|edge| subscriber_ids.contains(&edge.subscriber_id))
            .filter_map(|edge| {
                tables.user(edge.author_id).map(|author| LinkedUser {
                    linked_id: edge.subscriber_id,
                    user: author.clone(),
                })
            })
            .collect())
    }

    async fn subscribers_of(&self, author_ids: &[Uuid]) -> StoreResult<Vec<LinkedUser>> {
        self.record("subscribers_of", author_ids)?;
        let tables = self.tables();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|edge| author_ids.contains(&edge.author_id))
            .filter_map(|edge| {
                tables.user(edge.subscriber_id).map(|subscriber| LinkedUser {
                    linked_id: edge.author_id,
                    user: subscriber.clone(),
                })
            })
            .collect())
    }

    async fn posts_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        self.record("posts_by_ids", ids)?;
        Ok(self
            .tables()
            .posts
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        self.record("posts_by_author_ids", author_ids)?;
        Ok(self
            .tables()
            .posts
            .iter()
            .filter(|p| author_ids.contains(&p.author_id))
            .cloned()
            .collect())
    }

    async fn all_posts(&self) -> StoreResult<Vec<Post>> {
        self.record("all_posts", NO_KEYS)?;
        Ok(self.tables().posts.clone())
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        self.record("profiles_by_ids", ids)?;
        Ok(self
            .tables()
            .profiles
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        self.record("profiles_by_user_ids", user_ids)?;
        Ok(self
            .tables()
            .profiles
            .iter()
            .filter(|p| user_ids.contains(&p.user_id))
            .cloned()
            .collect())
    }

    async fn all_profiles(&self) -> StoreResult<Vec<Profile>> {
        self.record("all_profiles", NO_KEYS)?;
        Ok(self.tables().profiles.clone())
    }

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> StoreResult<Vec<MemberType>> {
        self.record("member_types_by_ids", ids)?;
        Ok(self
            .tables()
            .member_types
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn all_member_types(&self) -> StoreResult<Vec<MemberType>> {
        self.record("all_member_types", NO_KEYS)?;
        Ok(self.tables().member_types.clone())
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        self.check_available("create_user")?;
        Ok(self.insert_user(&input.name, input.balance))
    }

    async fn update_user(&self, id: Uuid, changes: ChangeUser) -> StoreResult<User> {
        self.check_available("update_user")?;
        let mut tables = self.tables();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        changes.apply(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        self.check_available("delete_user")?;
        let mut tables = self.tables();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(StoreError::not_found("user", id));
        }
        tables.posts.retain(|p| p.author_id != id);
        tables.profiles.retain(|p| p.user_id != id);
        tables
            .subscriptions
            .retain(|edge| edge.subscriber_id != id && edge.author_id != id);
        Ok(())
    }

    async fn create_post(&self, input: CreatePost) -> StoreResult<Post> {
        self.check_available("create_post")?;
        if self.tables().user(input.author_id).is_none() {
            return Err(StoreError::Constraint(format!(
                "post author {} does not exist",
                input.author_id
            )));
        }
        Ok(self.insert_post(input.author_id, &input.title, &input.content))
    }

    async fn update_post(&self, id: Uuid, changes: ChangePost) -> StoreResult<Post> {
        self.check_available("update_post")?;
        let mut tables = self.tables();
        if let Some(author_id) = changes.author_id {
            if tables.user(author_id).is_none() {
                return Err(StoreError::Constraint(format!(
                    "post author {} does not exist",
                    author_id
                )));
            }
        }
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("post", id))?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        self.check_available("delete_post")?;
        let mut tables = self.tables();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(StoreError::not_found("post", id));
        }
        Ok(())
    }

    async fn create_profile(&self, input: CreateProfile) -> StoreResult<Profile> {
        self.check_available("create_profile")?;
        {
            let tables = self.tables();
            if tables.user(input.user_id).is_none() {
                return Err(StoreError::Constraint(format!(
                    "profile user {} does not exist",
                    input.user_id
                )));
            }
            if tables.profiles.iter().any(|p| p.user_id == input.user_id) {
                return Err(StoreError::Constraint(format!(
                    "user {} already has a profile",
                    input.user_id
                )));
            }
        }
        Ok(self.insert_profile(
            input.user_id,
            input.member_type_id,
            input.is_male,
            input.year_of_birth,
        ))
    }

    async fn update_profile(&self, id: Uuid, changes: ChangeProfile) -> StoreResult<Profile> {
        self.check_available("update_profile")?;
        let mut tables = self.tables();
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("profile", id))?;
        changes.apply(profile);
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: Uuid) -> StoreResult<()> {
        self.check_available("delete_profile")?;
        let mut tables = self.tables();
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.id != id);
        if tables.profiles.len() == before {
            return Err(StoreError::not_found("profile", id));
        }
        Ok(())
    }

    async fn subscribe(&self, edge: SubscriptionEdge) -> StoreResult<()> {
        self.check_available("subscribe")?;
        let mut tables = self.tables();
        if tables.user(edge.subscriber_id).is_none() || tables.user(edge.author_id).is_none() {
            return Err(StoreError::Constraint(
                "subscription endpoints must both exist".to_string(),
            ));
        }
        if tables.subscriptions.contains(&edge) {
            return Err(StoreError::Constraint(format!(
                "{} already subscribes to {}",
                edge.subscriber_id, edge.author_id
            )));
        }
        tables.subscriptions.push(edge);
        Ok(())
    }

    async fn unsubscribe(&self, edge: SubscriptionEdge) -> StoreResult<()> {
        self.check_available("unsubscribe")?;
        let mut tables = self.tables();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|e| *e != edge);
        if tables.subscriptions.len() == before {
            return Err(StoreError::not_found(
                "subscription",
                format!("{} -> {}", edge.subscriber_id, edge.author_id),
            ));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available("ping")
    }
}
