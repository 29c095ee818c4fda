//! MongoDB storage implementation
//!
//! Keeps one document per policy rule in a single collection.

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    error::{Error as MongoError, ErrorKind},
    options::ClientOptions,
    Client, Collection, IndexModel,
};
use rule_vault_core::CasbinRule;
use tokio_stream::StreamExt;

use crate::adapter::PolicyAdapter;
use crate::config::{MongoConfig, INDEXED_FIELDS};
use crate::{RuleStore, StorageError};

/// Server error code for a missing namespace ("ns not found")
const NAMESPACE_NOT_FOUND: i32 = 26;

/// Adapter backed by MongoDB
pub type MongoAdapter = PolicyAdapter<MongoRuleStore>;

/// MongoDB session and rule collection handle
///
/// Call [`RuleStore::close`] to release the client. Dropping an unclosed
/// store releases it as well, but the driver finishes that in the
/// background at an unspecified time.
pub struct MongoRuleStore {
    client: Option<Client>,
    collection: Collection<CasbinRule>,
    database: String,
}

impl MongoRuleStore {
    /// Connect and select the rule collection
    pub async fn open(config: &MongoConfig) -> Result<Self, StorageError> {
        let options = ClientOptions::parse(&config.url)
            .await
            .map_err(|e| StorageError::Config(format!("Invalid MongoDB URL: {}", e)))?;
        let database = config.resolve_database(options.default_database.as_deref());

        let client = Client::with_options(options)
            .map_err(|e| StorageError::Connection(format!("Failed to create client: {}", e)))?;

        // The driver connects lazily; ping so an unreachable server fails here.
        let db = client.database(&database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to reach MongoDB: {}", e)))?;

        let collection = db.collection::<CasbinRule>(&config.collection);

        tracing::info!(
            "Connected to MongoDB, database: {}, collection: {}",
            database,
            config.collection
        );

        Ok(Self {
            client: Some(client),
            collection,
            database,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// Names of the indexes on the rule collection, e.g. `ptype_1`
    pub async fn index_names(&self) -> Result<Vec<String>, StorageError> {
        self.check_open()?;
        self.collection
            .list_index_names()
            .await
            .map_err(|e| StorageError::Index(format!("Failed to list indexes: {}", e)))
    }

    fn check_open(&self) -> Result<(), StorageError> {
        if self.client.is_none() {
            return Err(StorageError::Closed);
        }
        Ok(())
    }
}

fn is_namespace_not_found(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => {
            cmd.code == NAMESPACE_NOT_FOUND || cmd.code_name == "NamespaceNotFound"
        }
        _ => err.to_string().contains("ns not found"),
    }
}

#[async_trait]
impl RuleStore for MongoRuleStore {
    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        self.check_open()?;
        for field in INDEXED_FIELDS {
            let mut keys = Document::new();
            keys.insert(field, 1i32);
            let index = IndexModel::builder().keys(keys).build();

            self.collection
                .create_index(index, None)
                .await
                .map_err(|e| {
                    StorageError::Index(format!("Failed to create index on {}: {}", field, e))
                })?;
            tracing::debug!("Ensured index on {}", field);
        }
        Ok(())
    }

    async fn scan(
        &self,
        visit: &mut (dyn FnMut(CasbinRule) + Send),
    ) -> Result<usize, StorageError> {
        self.check_open()?;
        let mut cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(|e| StorageError::Cursor(format!("Query failed: {}", e)))?;

        let mut count = 0;
        while let Some(row) = cursor.next().await {
            let record =
                row.map_err(|e| StorageError::Cursor(format!("Failed to read rule: {}", e)))?;
            visit(record);
            count += 1;
        }
        Ok(count)
    }

    async fn insert_many(&self, records: Vec<CasbinRule>) -> Result<(), StorageError> {
        self.check_open()?;
        // The driver rejects an empty batch.
        if records.is_empty() {
            return Ok(());
        }

        let count = records.len();
        self.collection
            .insert_many(records, None)
            .await
            .map_err(|e| StorageError::Insert(format!("Failed to insert rules: {}", e)))?;

        tracing::debug!("Inserted {} rules into {}", count, self.collection.name());
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), StorageError> {
        self.check_open()?;
        match self.collection.drop(None).await {
            Ok(()) => {
                tracing::debug!("Dropped collection {}", self.collection.name());
                Ok(())
            }
            Err(e) if is_namespace_not_found(&e) => {
                tracing::debug!(
                    "Collection {} not found, nothing to drop",
                    self.collection.name()
                );
                Ok(())
            }
            Err(e) => Err(StorageError::Internal(format!(
                "Failed to drop collection: {}",
                e
            ))),
        }
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            tracing::info!("Closed MongoDB session for database {}", self.database);
        }
        Ok(())
    }
}

impl Drop for MongoRuleStore {
    fn drop(&mut self) {
        if self.client.take().is_some() {
            tracing::warn!(
                "MongoDB session for database {} dropped without close()",
                self.database
            );
        }
    }
}

impl MongoAdapter {
    /// Connect to `url` with the default collection
    ///
    /// Uses the database named in the URL, or `casbin` when there is none.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        Self::with_config(MongoConfig::from_url(url)).await
    }

    /// Connect and ensure indexes; any failure leaves no adapter behind
    pub async fn with_config(config: MongoConfig) -> Result<Self, StorageError> {
        let store = MongoRuleStore::open(&config).await?;
        PolicyAdapter::new(store).await
    }
}
