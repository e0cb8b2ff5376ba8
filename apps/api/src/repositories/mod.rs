//! Store access layer for Pulse
//!
//! All reads the GraphQL layer performs go through the [`Store`] trait: a
//! narrow, stateless fetch contract of bulk reads by primary key set or
//! foreign key set. Batching and caching live above it, in the per-request
//! loaders; a `Store` never caches and never retries.
//!
//! Two implementations are provided:
//! - [`PgStore`]: PostgreSQL via sqlx, one `= ANY($1)` query per call
//! - [`MemoryStore`]: in-process tables with a fetch log, for tests and demos

pub mod memory;
pub mod postgres;
pub mod utils;

pub use memory::{FetchCall, MemoryStore};
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile, CreateUser, LinkedUser,
    MemberType, MemberTypeId, Post, Profile, RequestedRelations, SubscriptionEdge, User,
    UserWithSubscriptions,
};

/// Errors raised by a [`Store`]
///
/// "No rows matched" is never an error for bulk reads; it is an empty `Vec`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write targeted a row that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A write violated a uniqueness or reference constraint
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a not found error for a specific entity
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for unique and foreign key violations, whichever backend raised them
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Constraint(_) => true,
            Self::Database(sqlx::Error::Database(db_err)) => {
                db_err.is_unique_violation() || db_err.is_foreign_key_violation()
            }
            _ => false,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Fetch contract over the persistence engine
///
/// Every read is a single bulk round-trip. Rows come back in arbitrary
/// order; callers index them by key.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    // ==================== Users ====================

    /// Users whose id is in `ids`
    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    /// Every user, with edge ids for the requested directions only
    async fn users_with_subscriptions(
        &self,
        relations: RequestedRelations,
    ) -> StoreResult<Vec<UserWithSubscriptions>>;

    /// Authors followed by each of `subscriber_ids`; `linked_id` is the subscriber
    async fn authors_followed_by(&self, subscriber_ids: &[Uuid]) -> StoreResult<Vec<LinkedUser>>;

    /// Subscribers of each of `author_ids`; `linked_id` is the author
    async fn subscribers_of(&self, author_ids: &[Uuid]) -> StoreResult<Vec<LinkedUser>>;

    // ==================== Posts ====================

    /// Posts whose id is in `ids`
    async fn posts_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Post>>;

    /// Posts whose author is in `author_ids`
    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> StoreResult<Vec<Post>>;

    /// Every post
    async fn all_posts(&self) -> StoreResult<Vec<Post>>;

    // ==================== Profiles ====================

    /// Profiles whose id is in `ids`
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Profile>>;

    /// Profiles owned by users in `user_ids` (at most one each)
    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>>;

    /// Every profile
    async fn all_profiles(&self) -> StoreResult<Vec<Profile>>;

    // ==================== Member types ====================

    /// Member types whose id is in `ids`
    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> StoreResult<Vec<MemberType>>;

    /// Every member type
    async fn all_member_types(&self) -> StoreResult<Vec<MemberType>>;

    // ==================== Writes ====================

    async fn create_user(&self, input: CreateUser) -> StoreResult<User>;

    async fn update_user(&self, id: Uuid, changes: ChangeUser) -> StoreResult<User>;

    /// Delete a user together with its posts, profile and edges
    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;

    async fn create_post(&self, input: CreatePost) -> StoreResult<Post>;

    async fn update_post(&self, id: Uuid, changes: ChangePost) -> StoreResult<Post>;

    async fn delete_post(&self, id: Uuid) -> StoreResult<()>;

    async fn create_profile(&self, input: CreateProfile) -> StoreResult<Profile>;

    async fn update_profile(&self, id: Uuid, changes: ChangeProfile) -> StoreResult<Profile>;

    async fn delete_profile(&self, id: Uuid) -> StoreResult<()>;

    /// Insert a subscription edge
    async fn subscribe(&self, edge: SubscriptionEdge) -> StoreResult<()>;

    /// Remove a subscription edge
    async fn unsubscribe(&self, edge: SubscriptionEdge) -> StoreResult<()>;

    // ==================== Health ====================

    /// Cheap connectivity check used by the readiness probe
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("user", "abc");
        assert_eq!(err.to_string(), "user not found: abc");
    }

    #[test]
    fn test_constraint_detection() {
        assert!(StoreError::Constraint("dup".to_string()).is_constraint_violation());
        assert!(!StoreError::Unavailable("down".to_string()).is_constraint_violation());
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_constraint_violation());
    }
}
