//! Module management commands

use crate::output::{self, OutputFormat};
use crate::ModuleCommands;
use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use modhub_common::ReconciledRow;
use modhub_core::kubernetes::K8sClient;
use modhub_core::modules::join_views;
use modhub_core::{ModhubConfig, ModuleManager, SaveOutcome};
use serde::Serialize;
use std::time::Duration;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct CatalogRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "REPOSITORY")]
    repository: String,
    #[tabled(rename = "LATEST")]
    #[serde(rename = "latestVersion")]
    latest_version: String,
}

impl From<ReconciledRow> for CatalogRow {
    fn from(row: ReconciledRow) -> Self {
        Self {
            name: row.name,
            repository: row.repository,
            latest_version: row.latest_version,
        }
    }
}

#[derive(Tabled, Serialize)]
struct ModuleRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "MANAGED")]
    #[serde(rename = "managed")]
    managed_label: &'static str,
}

impl From<ReconciledRow> for ModuleRow {
    fn from(row: ReconciledRow) -> Self {
        Self {
            managed_label: row.managed_label(),
            name: row.name,
            version: row.version,
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn handle_module_command(
    command: ModuleCommands,
    config: &ModhubConfig,
    format: OutputFormat,
) -> Result<()> {
    let manager = ModuleManager::from_config(config)?;

    match command {
        ModuleCommands::Catalog => {
            let progress = spinner("Fetching module catalog...");
            let catalog = manager.catalog().await;
            progress.finish_and_clear();

            let rows: Vec<CatalogRow> = join_views(&[&catalog?])
                .into_iter()
                .map(CatalogRow::from)
                .collect();
            output::print_output(rows, format)?;
        }

        ModuleCommands::List => {
            let client = K8sClient::from_config(&config.cluster).await?;

            let progress = spinner("Reading module state...");
            let views = tokio::try_join!(manager.managed(&client), manager.installed(&client));
            progress.finish_and_clear();
            let (managed, installed) = views?;

            let rows: Vec<ModuleRow> = join_views(&[&managed, &installed])
                .into_iter()
                .map(ModuleRow::from)
                .collect();
            output::print_output(rows, format)?;
        }

        ModuleCommands::Add { name, channel } => {
            let client = K8sClient::from_config(&config.cluster).await?;
            let outcome = manager.enable(&client, &name, &channel).await?;

            report(outcome, &client, &format!("Module '{}' added", name), || {
                format!("Module '{}' is already declared", name)
            })?;
        }

        ModuleCommands::Delete { name, yes } => {
            if !yes {
                use dialoguer::Confirm;

                let confirm = Confirm::new()
                    .with_prompt(format!("Are you sure you want to remove module {}?", name))
                    .default(false)
                    .interact()?;

                if !confirm {
                    output::print_info("Deletion cancelled");
                    return Ok(());
                }
            }

            let client = K8sClient::from_config(&config.cluster).await?;
            let outcome = manager.disable(&client, &name).await?;

            report(outcome, &client, &format!("Module '{}' removed", name), || {
                format!("Module '{}' is not declared", name)
            })?;
        }
    }

    Ok(())
}

fn report(
    outcome: SaveOutcome,
    client: &K8sClient,
    committed: &str,
    unchanged: impl FnOnce() -> String,
) -> Result<()> {
    let kyma = client.kyma();

    match outcome {
        SaveOutcome::Committed => output::print_success(committed),
        SaveOutcome::Unchanged => output::print_info(&unchanged()),
        SaveOutcome::Conflict => {
            output::print_warning("The Kyma resource was modified by someone else, retry the command");
            bail!("update of Kyma {}/{} was rejected", kyma.namespace, kyma.name);
        }
        SaveOutcome::KymaMissing => {
            bail!("Kyma {}/{} not found", kyma.namespace, kyma.name);
        }
    }

    Ok(())
}
