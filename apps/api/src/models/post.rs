//! Post model for Pulse

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post record from the posts table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Post {
    /// Unique post identifier
    pub id: Uuid,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,

    /// Owning user (foreign key to users.id)
    pub author_id: Uuid,
}

/// Post creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Partial post update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangePost {
    pub author_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ChangePost {
    /// Apply the changed fields to an existing row
    pub fn apply(&self, post: &mut Post) {
        if let Some(author_id) = self.author_id {
            post.author_id = author_id;
        }
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
    }
}
