//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure for integration tests,
//! including a seeded in-memory store and helpers for executing GraphQL
//! requests the way the HTTP handler does.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
