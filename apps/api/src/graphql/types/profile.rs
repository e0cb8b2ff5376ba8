//! Profile GraphQL type

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::models::Profile as DbProfile;

use super::member_type::{MemberType, MemberTypeId};
use super::user::User;

/// Profile information exposed via GraphQL
pub struct Profile {
    inner: DbProfile,
}

impl Profile {
    /// Create a new GraphQL Profile from a database Profile
    pub fn new(profile: DbProfile) -> Self {
        Self { inner: profile }
    }
}

impl From<DbProfile> for Profile {
    fn from(profile: DbProfile) -> Self {
        Self::new(profile)
    }
}

#[Object]
impl Profile {
    /// Unique profile identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn is_male(&self) -> bool {
        self.inner.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.inner.year_of_birth
    }

    /// Membership tier ID
    async fn member_type_id(&self) -> MemberTypeId {
        self.inner.member_type_id.into()
    }

    /// Owning user ID
    async fn user_id(&self) -> Uuid {
        self.inner.user_id
    }

    // Relationship resolvers

    /// Membership tier (uses DataLoader for batched fetching)
    async fn member_type(&self, ctx: &Context<'_>) -> Result<Option<MemberType>> {
        let loaders = ctx.data::<Loaders>()?;
        let member_type = loaders
            .member_type
            .load_one(self.inner.member_type_id)
            .await?;
        Ok(member_type.map(MemberType::from))
    }

    /// Owning user (uses DataLoader for batched fetching)
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loaders = ctx.data::<Loaders>()?;
        let user = loaders.user.load_one(self.inner.user_id).await?;
        Ok(user.map(User::from))
    }
}
