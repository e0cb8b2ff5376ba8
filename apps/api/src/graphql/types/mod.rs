//! GraphQL type definitions for Pulse
//!
//! This module contains the GraphQL object types that are exposed
//! through the API. Each wraps its database model and resolves
//! relations through the request's loaders.

mod member_type;
mod post;
mod profile;
mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::Post;
pub use profile::Profile;
pub use user::User;
