use crate::commands::command_error::{CommandError, write_output};
use crate::commands::load_config;
use crate::services::snapshot_file::serialize_snapshot_to_yaml;
use crate::services::snapshot_source::{SnapshotConnector, SnapshotSource};

pub fn fetch_snapshot_command(
    project: &str,
    output: &str,
    config: Option<&str>,
) -> Result<(), CommandError> {
    let config = load_config(config)?;
    let connector = SnapshotConnector::from_config(&config.source)?;
    let snapshot = connector.fetch(project)?;

    let mut buffer = Vec::new();
    serialize_snapshot_to_yaml(&mut buffer, &snapshot).map_err(|source| CommandError::Write {
        path: output.to_string(),
        source,
    })?;
    write_output(output, buffer)?;

    println!(
        "Snapshot for {project} written to {output} ({} source)",
        connector.status().mode.as_str()
    );
    Ok(())
}
