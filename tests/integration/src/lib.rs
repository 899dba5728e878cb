//! Integration test utilities for the client SDK
//!
//! This crate provides payload builders and a recording command
//! collaborator for end-to-end tests against a live client.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
