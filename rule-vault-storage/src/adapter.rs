//! Policy load/save on top of a rule store

use async_trait::async_trait;
use rule_vault_core::{decode, encode, CasbinRule, Model, Rule};

use crate::{Adapter, AdapterError, RuleStore, StorageError};

/// Sections written by `save_policy`, in write order
pub const PERSISTED_SECTIONS: [&str; 2] = ["p", "g"];

/// Load/save-only adapter over any `RuleStore`
///
/// There is no locking around `save_policy`: it drops the collection and
/// reinserts, so a concurrent `load_policy` may see an empty or partial set.
pub struct PolicyAdapter<S: RuleStore> {
    store: S,
}

impl<S: RuleStore> PolicyAdapter<S> {
    /// Wrap `store`, making sure its indexes exist first
    ///
    /// On failure the store is closed before the error is returned.
    pub async fn new(mut store: S) -> Result<Self, StorageError> {
        if let Err(e) = store.ensure_indexes().await {
            if let Err(close_err) = store.close().await {
                tracing::warn!("Failed to close store after index error: {}", close_err);
            }
            return Err(e);
        }
        Ok(Self { store })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the store's session. Safe to call more than once.
    pub async fn close(&mut self) -> Result<(), StorageError> {
        self.store.close().await
    }

    /// Drop the whole collection
    pub async fn drop_all(&self) -> Result<(), StorageError> {
        self.store.drop_all().await
    }
}

/// One record per rule, section `p` first, then `g`
pub fn collect_records(model: &Model) -> Vec<CasbinRule> {
    PERSISTED_SECTIONS
        .iter()
        .filter_map(|sec| model.section(sec))
        .flat_map(|assertions| assertions.iter())
        .flat_map(|(ptype, ast)| {
            ast.policy
                .iter()
                .map(move |rule| encode(ptype, rule.as_slice()))
        })
        .collect()
}

#[async_trait]
impl<S: RuleStore> Adapter for PolicyAdapter<S> {
    async fn load_policy(&self, model: &mut Model) -> Result<(), AdapterError> {
        let count = self
            .store
            .scan(&mut |record| {
                let (sec, ptype, rule) = decode(&record);
                model.add_policy(&sec, &ptype, rule);
            })
            .await?;

        tracing::info!("Loaded {} policy rules", count);
        Ok(())
    }

    async fn save_policy(&self, model: &Model) -> Result<(), AdapterError> {
        self.store.drop_all().await?;

        let records = collect_records(model);
        let count = records.len();
        self.store.insert_many(records).await?;

        tracing::info!("Saved {} policy rules", count);
        Ok(())
    }

    async fn add_policy(&self, _sec: &str, _ptype: &str, _rule: Rule) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("add_policy"))
    }

    async fn remove_policy(
        &self,
        _sec: &str,
        _ptype: &str,
        _rule: Rule,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("remove_policy"))
    }

    async fn remove_filtered_policy(
        &self,
        _sec: &str,
        _ptype: &str,
        _field_index: usize,
        _field_values: Vec<String>,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("remove_filtered_policy"))
    }
}
