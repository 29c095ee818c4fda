//! Storage layer for Rule Vault
//!
//! Persists policy rules as flat records and implements the load/save
//! contract the policy engine expects.
//! Supports both in-memory (for development) and MongoDB backends.

pub mod adapter;
pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "mongodb")]
pub mod mongo;

pub use adapter::PolicyAdapter;
pub use config::{MongoConfig, DEFAULT_COLLECTION, DEFAULT_DATABASE};
pub use error::{AdapterError, StorageError};
pub use memory::InMemoryRuleStore;
pub use traits::{Adapter, RuleStore};

#[cfg(feature = "mongodb")]
pub use mongo::{MongoAdapter, MongoRuleStore};

/// Adapter backed by the in-memory store
pub type InMemoryAdapter = PolicyAdapter<InMemoryRuleStore>;
