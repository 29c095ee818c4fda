//! Storage traits defining the interface for persistence

use async_trait::async_trait;
use rule_vault_core::{CasbinRule, Model, Rule};

use crate::{AdapterError, StorageError};

/// Trait for a collection of flat `CasbinRule` records
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Create the single-field indexes on `ptype` and `v0..v5`
    async fn ensure_indexes(&self) -> Result<(), StorageError>;

    /// Stream every record to `visit` in storage order, returning the count
    async fn scan(
        &self,
        visit: &mut (dyn FnMut(CasbinRule) + Send),
    ) -> Result<usize, StorageError>;

    /// Insert records in one batch; an empty batch is a no-op
    async fn insert_many(&self, records: Vec<CasbinRule>) -> Result<(), StorageError>;

    /// Remove the whole collection; a missing collection is not an error
    async fn drop_all(&self) -> Result<(), StorageError>;

    /// Release the underlying session. Calling it again does nothing.
    async fn close(&mut self) -> Result<(), StorageError>;

    /// Collect every record
    async fn find_all(&self) -> Result<Vec<CasbinRule>, StorageError> {
        let mut records = Vec::new();
        self.scan(&mut |record| records.push(record)).await?;
        Ok(records)
    }
}

/// Persistence contract expected by the policy engine
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Load every stored rule into `model`
    async fn load_policy(&self, model: &mut Model) -> Result<(), AdapterError>;

    /// Replace everything stored with the `p` and `g` sections of `model`
    async fn save_policy(&self, model: &Model) -> Result<(), AdapterError>;

    /// Add a single rule
    async fn add_policy(&self, sec: &str, ptype: &str, rule: Rule) -> Result<(), AdapterError>;

    /// Remove a single rule
    async fn remove_policy(&self, sec: &str, ptype: &str, rule: Rule)
        -> Result<(), AdapterError>;

    /// Remove the rules whose fields from `field_index` on match `field_values`
    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: Vec<String>,
    ) -> Result<(), AdapterError>;
}
