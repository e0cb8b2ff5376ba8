//! Profile model for Pulse
//!
//! A profile belongs to exactly one user (`user_id` is unique) and
//! references one entry of the static member type table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::member_type::MemberTypeId;

/// Profile record from the profiles table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Profile {
    /// Unique profile identifier
    pub id: Uuid,

    pub is_male: bool,

    pub year_of_birth: i32,

    /// Membership tier (foreign key to member_types.id)
    pub member_type_id: MemberTypeId,

    /// Owning user (unique foreign key to users.id)
    pub user_id: Uuid,
}

/// Profile creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
    pub is_male: bool,
    pub year_of_birth: i32,
}

/// Partial profile update; the owning user cannot be changed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeProfile {
    pub member_type_id: Option<MemberTypeId>,
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
}

impl ChangeProfile {
    /// Apply the changed fields to an existing row
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(member_type_id) = self.member_type_id {
            profile.member_type_id = member_type_id;
        }
        if let Some(is_male) = self.is_male {
            profile.is_male = is_male;
        }
        if let Some(year_of_birth) = self.year_of_birth {
            profile.year_of_birth = year_of_birth;
        }
    }
}
