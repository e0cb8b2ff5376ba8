//! Profile and member type queries for Pulse GraphQL API

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::graphql::types::{MemberType, MemberTypeId, Profile};

/// Profile-related queries
#[derive(Default)]
pub struct ProfileQuery;

#[Object]
impl ProfileQuery {
    // ==================== Profile Queries ====================

    /// Get a profile by ID
    async fn profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Profile>> {
        let loaders = ctx.data::<Loaders>()?;
        let profile = loaders.profile.load_one(id).await?;
        Ok(profile.map(Profile::from))
    }

    /// List all profiles
    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let loaders = ctx.data::<Loaders>()?;
        let profiles = loaders.all_profiles().await?;
        Ok(profiles.into_iter().map(Profile::from).collect())
    }

    // ==================== Member Type Queries ====================

    /// Get a member type by ID
    async fn member_type(
        &self,
        ctx: &Context<'_>,
        id: MemberTypeId,
    ) -> Result<Option<MemberType>> {
        let loaders = ctx.data::<Loaders>()?;
        let member_type = loaders.member_type.load_one(id.into()).await?;
        Ok(member_type.map(MemberType::from))
    }

    /// List all member types
    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberType>> {
        let loaders = ctx.data::<Loaders>()?;
        let member_types = loaders.all_member_types().await?;
        Ok(member_types.into_iter().map(MemberType::from).collect())
    }
}
