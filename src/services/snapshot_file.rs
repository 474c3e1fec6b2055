use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::anomaly::Observation;
use crate::domain::snapshot::{ProjectSnapshot, ProjectSnapshotRecord};
use crate::domain::validation::ValidationError;

#[derive(Error, Debug)]
pub enum SnapshotFileError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse yaml in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to parse json in {path}: {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid snapshot in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Reads a snapshot file (`.json` as JSON, anything else as YAML) and
/// validates it.
pub fn load_snapshot_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<ProjectSnapshot, SnapshotFileError> {
    let path = path.as_ref();
    let record: ProjectSnapshotRecord = read_structured_file(path)?;
    ProjectSnapshot::try_from(record).map_err(|source| SnapshotFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a list of observation records (`.json` as JSON, anything else as
/// YAML).
pub fn load_observations_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Observation>, SnapshotFileError> {
    read_structured_file(path.as_ref())
}

pub fn serialize_snapshot_to_yaml<W: Write>(
    writer: &mut W,
    snapshot: &ProjectSnapshot,
) -> io::Result<()> {
    let yaml = serde_yaml::to_string(&snapshot.to_record()).map_err(io::Error::other)?;
    writer.write_all(yaml.as_bytes())
}

fn read_structured_file<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotFileError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if is_json(path) {
        serde_json::from_str(&contents).map_err(|source| SnapshotFileError::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&contents).map_err(|source| SnapshotFileError::ParseYaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
