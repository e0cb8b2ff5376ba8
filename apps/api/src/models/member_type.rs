//! Member type model for Pulse
//!
//! Member types form a small static lookup table keyed by a closed enum.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Member type identifier matching PostgreSQL member_type_id enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_type_id", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberTypeId {
    Basic,
    Business,
}

impl MemberTypeId {
    /// All member types, in table order
    pub const ALL: [Self; 2] = [Self::Basic, Self::Business];

    /// Returns the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Business => "business",
        }
    }
}

impl std::fmt::Display for MemberTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member type record from the member_types table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct MemberType {
    pub id: MemberTypeId,

    /// Discount rate in percent
    pub discount: f64,

    pub posts_limit_per_month: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_type_id_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MemberTypeId::Business).unwrap(),
            "\"business\""
        );
        assert_eq!(MemberTypeId::Basic.to_string(), "basic");
    }
}
