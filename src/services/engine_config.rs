use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::risk::Severity;
use crate::domain::validation::ValidationError;

pub const MIN_ITERATIONS: usize = 100;
pub const MAX_ITERATIONS: usize = 100_000;

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// Every knob of the engine. Callers hand the core an immutable reference;
/// reloading happens outside by building a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub anomaly: AnomalyThresholds,
    pub health: HealthWeights,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub iterations: usize,
    pub schedule_std_dev_multiplier: f64,
    pub cost_std_dev_multiplier: f64,
    /// Lower clip for sampled performance factors.
    pub min_factor: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            schedule_std_dev_multiplier: 0.15,
            cost_std_dev_multiplier: 0.15,
            min_factor: 0.05,
            seed: None,
        }
    }
}

/// Cut points of one dimension. A value has to strictly exceed a cut point to
/// land in the band above it; values at or below `floor` produce no finding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityBands {
    pub floor: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl SeverityBands {
    pub const fn new(floor: f64, medium: f64, high: f64, critical: f64) -> Self {
        Self {
            floor,
            medium,
            high,
            critical,
        }
    }

    /// Band of `value` and the cut point it exceeded.
    pub fn classify(&self, value: f64) -> Option<(Severity, f64)> {
        if value > self.critical {
            Some((Severity::Critical, self.critical))
        } else if value > self.high {
            Some((Severity::High, self.high))
        } else if value > self.medium {
            Some((Severity::Medium, self.medium))
        } else if value > self.floor {
            Some((Severity::Low, self.floor))
        } else {
            None
        }
    }

    fn validate(&self, name: &str) -> Result<(), ValidationError> {
        let cut_points = [self.floor, self.medium, self.high, self.critical];
        if cut_points.iter().any(|value| !value.is_finite()) {
            return Err(ValidationError::InvalidConfig {
                field: format!("anomaly.{name}"),
                reason: "cut points must be finite".to_string(),
            });
        }
        if cut_points.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(ValidationError::InvalidConfig {
                field: format!("anomaly.{name}"),
                reason: "cut points must satisfy floor <= medium <= high <= critical".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    pub safety: SeverityBands,
    /// `floor` doubles as the tolerated progress gap in percentage points.
    pub schedule: SeverityBands,
    pub cost: SeverityBands,
    pub quality: SeverityBands,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            safety: SeverityBands::new(0.5, 0.5, 0.7, 0.85),
            schedule: SeverityBands::new(5.0, 10.0, 20.0, 30.0),
            cost: SeverityBands::new(5.0, 10.0, 15.0, 25.0),
            quality: SeverityBands::new(2.0, 5.0, 10.0, 20.0),
        }
    }
}

impl AnomalyThresholds {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.safety.validate("safety")?;
        self.schedule.validate("schedule")?;
        self.cost.validate("cost")?;
        self.quality.validate("quality")
    }
}

/// Health score weights, in score points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    pub schedule_weight: f64,
    pub cost_weight: f64,
    pub critical_finding_penalty: f64,
    pub high_finding_penalty: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            schedule_weight: 45.0,
            cost_weight: 45.0,
            critical_finding_penalty: 10.0,
            high_finding_penalty: 5.0,
        }
    }
}

impl HealthWeights {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let weights = [
            ("health.schedule_weight", self.schedule_weight),
            ("health.cost_weight", self.cost_weight),
            ("health.critical_finding_penalty", self.critical_finding_penalty),
            ("health.high_finding_penalty", self.high_finding_penalty),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidConfig {
                    field: field.to_string(),
                    reason: format!("must be a finite, non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    Live,
    #[default]
    Stub,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Live => "live",
            SourceMode::Stub => "stub",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub base_url: String,
    /// Name of the environment variable holding the bearer token.
    pub api_token_env: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Stub,
            base_url: String::new(),
            api_token_env: "SITECAST_API_TOKEN".to_string(),
            timeout_secs: 10,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(ValidationError::IterationsOutOfRange {
                iterations: self.iterations,
                min: MIN_ITERATIONS,
                max: MAX_ITERATIONS,
            });
        }
        let multipliers = [
            (
                "simulation.schedule_std_dev_multiplier",
                self.schedule_std_dev_multiplier,
            ),
            (
                "simulation.cost_std_dev_multiplier",
                self.cost_std_dev_multiplier,
            ),
        ];
        for (field, value) in multipliers {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidConfig {
                    field: field.to_string(),
                    reason: format!("must be a finite, non-negative number, got {value}"),
                });
            }
        }
        if !self.min_factor.is_finite() || self.min_factor <= 0.0 {
            return Err(ValidationError::InvalidConfig {
                field: "simulation.min_factor".to_string(),
                reason: format!("must be strictly positive, got {}", self.min_factor),
            });
        }
        Ok(())
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.simulation.validate()?;
        self.anomaly.validate()?;
        self.health.validate()
    }
}

pub fn load_engine_config_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<EngineConfig, ConfigFileError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
