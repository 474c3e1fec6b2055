use std::env;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::snapshot::{ProjectSnapshot, ProjectSnapshotRecord};
use crate::domain::validation::ValidationError;
use crate::services::engine_config::{SourceConfig, SourceMode};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] ValidationError),
    #[error("invalid source configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub mode: SourceMode,
    pub endpoint: Option<String>,
    pub authenticated: bool,
}

/// Where project snapshots come from.
pub trait SnapshotSource {
    fn fetch(&self, project_name: &str) -> Result<ProjectSnapshot, SourceError>;
    fn status(&self) -> SourceStatus;
}

/// Pulls snapshots from `GET {base_url}/projects/{name}/snapshot`.
pub struct LiveSnapshotSource {
    base_url: Url,
    token: Option<String>,
    client: Client,
}

impl LiveSnapshotSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        if config.base_url.trim().is_empty() {
            return Err(SourceError::Config(
                "source.base_url is required in live mode".to_string(),
            ));
        }
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| SourceError::Config(format!("invalid base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Config(format!(
                "base_url cannot be used as a base: {base_url}"
            )));
        }
        let token = env::var(&config.api_token_env)
            .ok()
            .filter(|token| !token.is_empty());
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    fn snapshot_url(&self, project_name: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Config(format!("invalid base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["projects", project_name, "snapshot"]);
        Ok(url)
    }
}

impl SnapshotSource for LiveSnapshotSource {
    fn fetch(&self, project_name: &str) -> Result<ProjectSnapshot, SourceError> {
        let url = self.snapshot_url(project_name)?;
        debug!(%url, "fetching project snapshot");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(project_name.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Connection(format!(
                "unexpected status {status}"
            )));
        }

        let record: ProjectSnapshotRecord = response
            .json()
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        let snapshot = ProjectSnapshot::try_from(record)?;
        info!(project = snapshot.project_name(), "fetched live snapshot");
        Ok(snapshot)
    }

    fn status(&self) -> SourceStatus {
        SourceStatus {
            mode: SourceMode::Live,
            endpoint: Some(self.base_url.to_string()),
            authenticated: self.token.is_some(),
        }
    }
}

/// Serves the same demonstration snapshot for every project name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSnapshotSource;

impl SnapshotSource for StubSnapshotSource {
    fn fetch(&self, project_name: &str) -> Result<ProjectSnapshot, SourceError> {
        let planned_end_date = NaiveDate::from_ymd_opt(2027, 3, 31)
            .ok_or_else(|| SourceError::Parse("invalid stub end date".to_string()))?;
        let record = ProjectSnapshotRecord {
            project_name: project_name.to_string(),
            planned_end_date,
            current_progress: 42.0,
            planned_progress: 48.0,
            elapsed_days: 180,
            project_duration_days: 365,
            budget: 4_800_000.0,
            actual_cost: 2_150_000.0,
        };
        debug!(project = project_name, "serving stub snapshot");
        Ok(ProjectSnapshot::try_from(record)?)
    }

    fn status(&self) -> SourceStatus {
        SourceStatus {
            mode: SourceMode::Stub,
            endpoint: None,
            authenticated: false,
        }
    }
}

/// Connector variant picked once from configuration.
pub enum SnapshotConnector {
    Live(LiveSnapshotSource),
    Stub(StubSnapshotSource),
}

impl SnapshotConnector {
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        match config.mode {
            SourceMode::Live => Ok(Self::Live(LiveSnapshotSource::new(config)?)),
            SourceMode::Stub => Ok(Self::Stub(StubSnapshotSource)),
        }
    }
}

impl SnapshotSource for SnapshotConnector {
    fn fetch(&self, project_name: &str) -> Result<ProjectSnapshot, SourceError> {
        match self {
            Self::Live(source) => source.fetch(project_name),
            Self::Stub(source) => source.fetch(project_name),
        }
    }

    fn status(&self) -> SourceStatus {
        match self {
            Self::Live(source) => source.status(),
            Self::Stub(source) => source.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_config(base_url: &str) -> SourceConfig {
        SourceConfig {
            mode: SourceMode::Live,
            base_url: base_url.to_string(),
            api_token_env: "SITECAST_TEST_TOKEN_UNSET".to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn stub_is_default_connector() {
        let connector = SnapshotConnector::from_config(&SourceConfig::default()).unwrap();
        assert!(matches!(connector, SnapshotConnector::Stub(_)));
        assert_eq!(connector.status().mode, SourceMode::Stub);
    }

    #[test]
    fn stub_snapshot_is_valid_and_named() {
        let snapshot = StubSnapshotSource.fetch("Riverside Tower").unwrap();
        assert_eq!(snapshot.project_name(), "Riverside Tower");
        assert_eq!(snapshot.remaining_days(), 185);
    }

    #[test]
    fn stub_rejects_blank_project_names() {
        assert!(matches!(
            StubSnapshotSource.fetch(" "),
            Err(SourceError::Invalid(ValidationError::EmptyProjectName))
        ));
    }

    #[test]
    fn live_mode_requires_base_url() {
        let result = SnapshotConnector::from_config(&live_config(""));
        assert!(matches!(result, Err(SourceError::Config(_))));

        let result = SnapshotConnector::from_config(&live_config("not a url"));
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[test]
    fn live_url_escapes_project_name() {
        let source = LiveSnapshotSource::new(&live_config("http://localhost:8080/api/")).unwrap();
        let url = source.snapshot_url("North Wing/2").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/projects/North%20Wing%2F2/snapshot"
        );
        let status = source.status();
        assert_eq!(status.mode, SourceMode::Live);
        assert!(!status.authenticated);
    }

    #[test]
    fn unreachable_live_source_is_a_connection_error() {
        let source = LiveSnapshotSource::new(&live_config("http://127.0.0.1:9")).unwrap();
        assert!(matches!(
            source.fetch("Anything"),
            Err(SourceError::Connection(_))
        ));
    }
}
