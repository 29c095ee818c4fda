//! Core domain models for Rule Vault
//!
//! This crate contains the shared data structures used across
//! the adapter: the in-memory policy Model, the flat CasbinRule
//! storage record, the codec between the two and the policy file format.

pub mod codec;
pub mod error;
pub mod models;
pub mod policy_file;

pub use codec::{decode, encode, section_of, MAX_RULE_FIELDS};
pub use error::CoreError;
pub use models::*;
