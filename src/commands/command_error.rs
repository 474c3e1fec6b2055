use std::io;

use thiserror::Error;

use crate::domain::validation::ValidationError;
use crate::services::engine_config::ConfigFileError;
use crate::services::forecast_error::ForecastError;
use crate::services::histogram::HistogramError;
use crate::services::snapshot_file::SnapshotFileError;
use crate::services::snapshot_source::SourceError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigFileError),
    #[error(transparent)]
    Input(#[from] SnapshotFileError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

pub(crate) fn write_output(path: &str, contents: impl AsRef<[u8]>) -> Result<(), CommandError> {
    std::fs::write(path, contents).map_err(|source| CommandError::Write {
        path: path.to_string(),
        source,
    })
}
