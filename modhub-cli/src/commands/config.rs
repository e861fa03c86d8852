//! Configuration commands

use crate::output::{self, OutputFormat};
use crate::ConfigCommands;
use anyhow::Result;
use modhub_core::ModhubConfig;

pub fn handle_config_command(
    command: ConfigCommands,
    config: &ModhubConfig,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Sample => {
            print!("{}", ModhubConfig::generate_sample());
        }

        ConfigCommands::Show => match format {
            OutputFormat::Table => output::print_toml(config)?,
            OutputFormat::Json => output::print_json(config)?,
            OutputFormat::Yaml => output::print_yaml(config)?,
        },
    }

    Ok(())
}
