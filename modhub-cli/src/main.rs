//! modhub CLI
//!
//! Command-line interface for Kyma community modules

mod commands;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modhub_core::ModhubConfig;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modhub", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to $MODHUB_CONFIG, ~/.config/modhub/config.toml, ./modhub.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Kubeconfig file
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true)]
    context: Option<String>,

    /// Community module catalog URL
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Command-line flags win over file and environment settings
    fn apply_overrides(&self, config: &mut ModhubConfig) {
        if let Some(path) = &self.kubeconfig {
            config.cluster.kubeconfig = Some(path.clone());
        }
        if let Some(context) = &self.context {
            config.cluster.context = Some(context.clone());
        }
        if let Some(url) = &self.catalog_url {
            config.catalog.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage Kyma modules
    Module {
        #[command(subcommand)]
        command: ModuleCommands,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ModuleCommands {
    /// List modules of the community catalog
    Catalog,
    /// List managed and installed modules
    List,
    /// Declare a module in the Kyma resource
    Add {
        /// Module name
        name: String,
        /// Release channel, the Kyma default channel applies when empty
        #[arg(short, long, default_value = "")]
        channel: String,
    },
    /// Remove a module from the Kyma resource
    Delete {
        /// Module name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a sample configuration file
    Sample,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that need no configuration
    match &cli.command {
        Commands::Completions { shell } => {
            generate_completions(*shell);
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Sample,
        } => {
            return commands::config::handle_config_command(
                ConfigCommands::Sample,
                &ModhubConfig::default(),
                cli.output,
            );
        }
        _ => {}
    }

    // Load config
    let mut config =
        ModhubConfig::load_with(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let _guard = logging::init(&config.logging)?;

    // Execute command
    match cli.command {
        Commands::Module { command } => {
            commands::module::handle_module_command(command, &config, cli.output).await?
        }
        Commands::Config { command } => {
            commands::config::handle_config_command(command, &config, cli.output)?
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
