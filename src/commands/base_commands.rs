use clap::{Parser, Subcommand};
use clap_complete::Shell;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value_t = Level::WARN)]
    pub log_level: Level,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute earned value metrics
    Evm {
        /// Budget at completion
        #[arg(long)]
        bac: f64,
        /// Actual cost to date
        #[arg(long, allow_negative_numbers = true)]
        ac: f64,
        /// Physical percent complete (0-100)
        #[arg(long, allow_negative_numbers = true)]
        percent_complete: f64,
        /// Planned percent complete (0-100)
        #[arg(long, allow_negative_numbers = true)]
        planned_percent: f64,
    },
    /// Forecast schedule, cost and health of a project snapshot
    Forecast {
        /// Snapshot YAML or JSON file
        #[arg(short, long)]
        input: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Optional engine config YAML
        #[arg(short, long)]
        config: Option<String>,
        /// Optional observation batch whose findings lower the health score
        #[arg(long)]
        observations: Option<String>,
        /// Number of simulation iterations (overrides the config)
        #[arg(short = 'n', long)]
        iterations: Option<usize>,
        /// Random seed for reproducible runs (overrides the config)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Optional PNG histogram of simulated completion days
        #[arg(long)]
        histogram: Option<String>,
    },
    /// Detect anomalies in a batch of observation records
    Detect {
        /// Observation YAML or JSON file
        #[arg(short, long)]
        input: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Optional engine config YAML
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Fetch a project snapshot from the configured source and write it to YAML
    FetchSnapshot {
        /// Project name
        #[arg(short, long)]
        project: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Optional engine config YAML
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Short description used in failure messages.
    pub fn action(&self) -> &'static str {
        match self {
            Commands::Evm { .. } => "compute earned value metrics",
            Commands::Forecast { .. } => "forecast project",
            Commands::Detect { .. } => "detect anomalies",
            Commands::FetchSnapshot { .. } => "fetch snapshot",
            Commands::Completions { .. } => "generate completions",
        }
    }
}
