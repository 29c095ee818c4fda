//! Subcommand implementations

use anyhow::Context;
use std::io::Write;

use rule_vault_core::{policy_file::parse_policy_text, Model};
use rule_vault_storage::{Adapter, PolicyAdapter, RuleStore};

use crate::Commands;

/// Run `command`, then close the adapter whether or not it succeeded
pub async fn run<S: RuleStore>(
    mut adapter: PolicyAdapter<S>,
    command: &Commands,
) -> anyhow::Result<()> {
    let result = execute(&adapter, command, &mut std::io::stdout()).await;
    adapter.close().await.context("Failed to close rule store")?;
    result
}

async fn execute<S: RuleStore, W: Write + Send>(
    adapter: &PolicyAdapter<S>,
    command: &Commands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Load { json } => {
            let mut model = Model::new();
            adapter
                .load_policy(&mut model)
                .await
                .context("Failed to load policy")?;

            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&model)?)?;
            } else {
                write!(out, "{}", model.to_policy_text())?;
            }
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut model = Model::new();
            let count = parse_policy_text(&text, &mut model)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            adapter
                .save_policy(&model)
                .await
                .context("Failed to save policy")?;

            writeln!(out, "Imported {} policy rules", count)?;
        }
        Commands::Clear => {
            adapter
                .drop_all()
                .await
                .context("Failed to drop rule collection")?;
            writeln!(out, "Cleared rule collection")?;
        }
    }
    Ok(())
}
