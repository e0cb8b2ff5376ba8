//! Member type GraphQL types

use async_graphql::{Enum, Object};

use crate::models::{MemberType as DbMemberType, MemberTypeId as DbMemberTypeId};

/// Member type identifier enum for GraphQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "lowercase")]
pub enum MemberTypeId {
    /// Basic membership
    Basic,
    /// Business membership
    Business,
}

impl From<DbMemberTypeId> for MemberTypeId {
    fn from(id: DbMemberTypeId) -> Self {
        match id {
            DbMemberTypeId::Basic => Self::Basic,
            DbMemberTypeId::Business => Self::Business,
        }
    }
}

impl From<MemberTypeId> for DbMemberTypeId {
    fn from(id: MemberTypeId) -> Self {
        match id {
            MemberTypeId::Basic => Self::Basic,
            MemberTypeId::Business => Self::Business,
        }
    }
}

/// Member type information exposed via GraphQL
pub struct MemberType {
    inner: DbMemberType,
}

impl From<DbMemberType> for MemberType {
    fn from(member_type: DbMemberType) -> Self {
        Self { inner: member_type }
    }
}

#[Object]
impl MemberType {
    async fn id(&self) -> MemberTypeId {
        self.inner.id.into()
    }

    /// Discount rate in percent
    async fn discount(&self) -> f64 {
        self.inner.discount
    }

    async fn posts_limit_per_month(&self) -> i32 {
        self.inner.posts_limit_per_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_type_id_conversion() {
        for id in DbMemberTypeId::ALL {
            let round_trip: DbMemberTypeId = MemberTypeId::from(id).into();
            assert_eq!(round_trip, id);
        }
    }
}
