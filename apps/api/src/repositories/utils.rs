//! Shared SQL fragments for the PostgreSQL store
//!
//! These constants define the SELECT column lists for each entity type,
//! reducing duplication and ensuring consistency across queries.

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, name, balance";

/// SQL columns for user queries joined under the `u` alias
pub const USER_COLUMNS_U: &str = "u.id, u.name, u.balance";

/// SQL columns for post queries
pub const POST_COLUMNS: &str = "id, title, content, author_id";

/// SQL columns for profile queries
pub const PROFILE_COLUMNS: &str = "id, is_male, year_of_birth, member_type_id, user_id";

/// SQL columns for member type queries
pub const MEMBER_TYPE_COLUMNS: &str = "id, discount, posts_limit_per_month";
