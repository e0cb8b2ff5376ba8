//! Database models and types for Pulse
//!
//! This module contains SQLx models for:
//! - Users and their subscription edges
//! - Posts authored by users
//! - Profiles and the static member type table

pub mod member_type;
pub mod post;
pub mod profile;
pub mod subscription;
pub mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::{ChangePost, CreatePost, Post};
pub use profile::{ChangeProfile, CreateProfile, Profile};
pub use subscription::{LinkedUser, RequestedRelations, SubscriptionEdge, UserWithSubscriptions};
pub use user::{ChangeUser, CreateUser, User};
