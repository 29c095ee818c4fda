//! In-memory rule store for development and testing

use async_trait::async_trait;
use rule_vault_core::CasbinRule;
use tokio::sync::RwLock;

use crate::config::INDEXED_FIELDS;
use crate::{RuleStore, StorageError};

/// In-memory stand-in for a rule collection
///
/// The collection only exists once something has been inserted, so
/// dropping a fresh store behaves like dropping a missing collection.
pub struct InMemoryRuleStore {
    records: RwLock<Option<Vec<CasbinRule>>>,
    indexes: RwLock<Vec<String>>,
    closed: bool,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(None),
            indexes: RwLock::new(Vec::new()),
            closed: false,
        }
    }

    /// Store seeded with existing records
    pub fn with_records(records: Vec<CasbinRule>) -> Self {
        Self {
            records: RwLock::new(Some(records)),
            ..Self::new()
        }
    }

    pub async fn collection_exists(&self) -> bool {
        self.records.read().await.is_some()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.as_ref().map_or(0, Vec::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn indexes(&self) -> Vec<String> {
        self.indexes.read().await.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> Result<(), StorageError> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        Ok(())
    }
}

impl Default for InMemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        self.check_open()?;
        let mut indexes = self.indexes.write().await;
        for field in INDEXED_FIELDS {
            if !indexes.iter().any(|f| f == field) {
                indexes.push(field.to_string());
            }
        }
        Ok(())
    }

    async fn scan(
        &self,
        visit: &mut (dyn FnMut(CasbinRule) + Send),
    ) -> Result<usize, StorageError> {
        self.check_open()?;
        let records = self.records.read().await;
        let records = records.as_deref().unwrap_or_default();
        for record in records {
            visit(record.clone());
        }
        Ok(records.len())
    }

    async fn insert_many(&self, records: Vec<CasbinRule>) -> Result<(), StorageError> {
        self.check_open()?;
        if records.is_empty() {
            return Ok(());
        }
        self.records
            .write()
            .await
            .get_or_insert_with(Vec::new)
            .extend(records);
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), StorageError> {
        self.check_open()?;
        if self.records.write().await.take().is_none() {
            tracing::debug!("collection not found, nothing to drop");
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        self.closed = true;
        Ok(())
    }
}
