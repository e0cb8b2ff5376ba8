//! Profile mutations for Pulse GraphQL API

use std::sync::Arc;

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use super::to_graphql_error;
use crate::graphql::types::{MemberTypeId, Profile};
use crate::models::{ChangeProfile, CreateProfile};
use crate::repositories::Store;

/// Input type for creating a profile
#[derive(Debug, Clone, InputObject)]
pub struct CreateProfileInput {
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
    pub is_male: bool,
    pub year_of_birth: i32,
}

impl From<CreateProfileInput> for CreateProfile {
    fn from(input: CreateProfileInput) -> Self {
        Self {
            user_id: input.user_id,
            member_type_id: input.member_type_id.into(),
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
        }
    }
}

/// Input type for changing a profile; the owning user cannot be changed
#[derive(Debug, Clone, InputObject)]
pub struct ChangeProfileInput {
    pub member_type_id: Option<MemberTypeId>,
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
}

impl From<ChangeProfileInput> for ChangeProfile {
    fn from(input: ChangeProfileInput) -> Self {
        Self {
            member_type_id: input.member_type_id.map(Into::into),
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
        }
    }
}

/// Profile mutations
#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    /// Create a profile for a user that does not have one yet
    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileInput) -> Result<Profile> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        let profile = store
            .create_profile(dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Profile::from(profile))
    }

    /// Change an existing profile
    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileInput,
    ) -> Result<Profile> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        let profile = store
            .update_profile(id, dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Profile::from(profile))
    }

    /// Delete a profile
    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<String>> {
        let store = ctx.data::<Arc<dyn Store>>()?;
        store.delete_profile(id).await.map_err(to_graphql_error)?;
        Ok(None)
    }
}
