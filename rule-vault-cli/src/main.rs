//! Rule Vault - command line entry point
//!
//! Loads, imports and clears policy rules stored in MongoDB.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rule_vault_storage::{
    config::DEFAULT_URL, InMemoryRuleStore, MongoAdapter, MongoConfig, PolicyAdapter,
    DEFAULT_COLLECTION,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Rule Vault policy storage tool
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// MongoDB connection URL; may name the database
    #[clap(long, env = "MONGO_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Database to use instead of the one in the URL
    #[clap(long, env = "RULE_VAULT_DATABASE")]
    database: Option<String>,

    /// Collection holding the rules
    #[clap(long, env = "RULE_VAULT_COLLECTION", default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Use a throwaway in-memory store instead of MongoDB
    #[clap(long)]
    memory: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every stored rule
    Load {
        /// Print the model as JSON instead of policy lines
        #[clap(long)]
        json: bool,
    },

    /// Replace the stored rules with the contents of a policy file
    Import {
        /// Path to a file of `ptype, v0, v1, ...` lines
        file: PathBuf,
    },

    /// Drop the rule collection
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is kept for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,rule_vault=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.memory {
        tracing::info!("Using in-memory rule store");
        let adapter = PolicyAdapter::new(InMemoryRuleStore::new()).await?;
        return commands::run(adapter, &cli.command).await;
    }

    let config = MongoConfig {
        url: cli.url,
        database: cli.database,
        collection: cli.collection,
    };
    let adapter = MongoAdapter::with_config(config)
        .await
        .context("Failed to open MongoDB rule store")?;

    commands::run(adapter, &cli.command).await
}
