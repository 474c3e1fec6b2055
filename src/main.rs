use clap::Parser;
use sitecast::commands::base_commands::CliArgs;
use sitecast::commands::run;
use sitecast::telemetry::init_tracing;

fn main() {
    let args = CliArgs::parse();
    init_tracing(args.json_logs, args.log_level);

    let action = args.command.action();
    if let Err(e) = run(args.command) {
        eprintln!("Failed to {action}: {e}");
        std::process::exit(1);
    }
}
