use crate::commands::command_error::{CommandError, write_output};
use crate::commands::load_config;
use crate::commands::report_format::format_anomaly_summary;
use crate::services::anomaly_detection::detect_anomalies;
use crate::services::snapshot_file::load_observations_from_file;

pub fn detect_command(input: &str, output: &str, config: Option<&str>) -> Result<(), CommandError> {
    let config = load_config(config)?;
    let observations = load_observations_from_file(input)?;
    let report = detect_anomalies(&observations, &config.anomaly)?;

    let yaml = serde_yaml::to_string(&report)?;
    write_output(output, yaml)?;

    println!("{}", format_anomaly_summary(&report));
    println!("Findings written to {output}");
    Ok(())
}
