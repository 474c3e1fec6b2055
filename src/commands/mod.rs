pub mod base_commands;
pub mod command_error;
pub mod detect_cmd;
pub mod evm_cmd;
pub mod fetch_snapshot_cmd;
pub mod forecast_cmd;
pub mod report_format;

use std::io;

use clap::CommandFactory;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::command_error::CommandError;
use crate::commands::forecast_cmd::ForecastArgs;
use crate::services::engine_config::{EngineConfig, load_engine_config_from_file};

pub fn run(command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Evm {
            bac,
            ac,
            percent_complete,
            planned_percent,
        } => evm_cmd::evm_command(bac, ac, percent_complete, planned_percent),
        Commands::Forecast {
            input,
            output,
            config,
            observations,
            iterations,
            seed,
            histogram,
        } => forecast_cmd::forecast_command(ForecastArgs {
            input,
            output,
            config,
            observations,
            iterations,
            seed,
            histogram,
        }),
        Commands::Detect {
            input,
            output,
            config,
        } => detect_cmd::detect_command(&input, &output, config.as_deref()),
        Commands::FetchSnapshot {
            project,
            output,
            config,
        } => fetch_snapshot_cmd::fetch_snapshot_command(&project, &output, config.as_deref()),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            clap_complete::generate(shell, &mut command, "sitecast", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, CommandError> {
    match path {
        Some(path) => Ok(load_engine_config_from_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}
