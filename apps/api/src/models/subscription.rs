//! Subscription edges between users
//!
//! An edge `subscriber_id -> author_id` means the subscriber follows the
//! author. The read shapes below carry edges together with the full user
//! row on the far end, so a single store read can answer a relation.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::User;

/// Row of the subscriptions table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRow, Serialize)]
pub struct SubscriptionEdge {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

/// A user row reached by following one edge from `linked_id`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct LinkedUser {
    /// The user on the near end of the edge (the requested key)
    pub linked_id: Uuid,

    /// The full row on the far end of the edge
    #[sqlx(flatten)]
    pub user: User,
}

/// A user together with the ids on the other end of its edges
///
/// Directions that were not requested come back empty.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserWithSubscriptions {
    #[sqlx(flatten)]
    pub user: User,

    /// Authors this user follows
    pub user_subscribed_to_ids: Vec<Uuid>,

    /// Users following this user
    pub subscribed_to_user_ids: Vec<Uuid>,
}

/// Which subscription directions a bulk user read should include
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestedRelations {
    /// Include `userSubscribedTo` (edges where the user is the subscriber)
    pub user_subscribed_to: bool,

    /// Include `subscribedToUser` (edges where the user is the author)
    pub subscribed_to_user: bool,
}

impl RequestedRelations {
    /// Both directions
    pub fn all() -> Self {
        Self {
            user_subscribed_to: true,
            subscribed_to_user: true,
        }
    }
}
