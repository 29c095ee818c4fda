//! Storage configuration

/// Database used when neither the config nor the connection URL names one
pub const DEFAULT_DATABASE: &str = "casbin";

/// Collection holding one document per policy rule
pub const DEFAULT_COLLECTION: &str = "casbin_rule";

pub const DEFAULT_URL: &str = "mongodb://localhost:27017";

/// Fields that get a single-field index
pub const INDEXED_FIELDS: [&str; 7] = ["ptype", "v0", "v1", "v2", "v3", "v4", "v5"];

/// MongoDB storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub url: String,
    /// Overrides the database named in `url`
    pub database: Option<String>,
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl MongoConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Read `MONGO_URL`, `RULE_VAULT_DATABASE` and `RULE_VAULT_COLLECTION`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("MONGO_URL").unwrap_or(defaults.url),
            database: lookup("RULE_VAULT_DATABASE").filter(|db| !db.is_empty()),
            collection: lookup("RULE_VAULT_COLLECTION")
                .filter(|c| !c.is_empty())
                .unwrap_or(defaults.collection),
        }
    }

    /// Database to use: the explicit override, then the one in the URL, then the default
    pub fn resolve_database(&self, from_url: Option<&str>) -> String {
        self.database
            .as_deref()
            .or(from_url)
            .filter(|db| !db.is_empty())
            .unwrap_or(DEFAULT_DATABASE)
            .to_string()
    }
}
