use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::risk::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Schedule,
    Cost,
    Safety,
    Quality,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Schedule,
        Dimension::Cost,
        Dimension::Safety,
        Dimension::Quality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Schedule => "schedule",
            Dimension::Cost => "cost",
            Dimension::Safety => "safety",
            Dimension::Quality => "quality",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Number(f64),
    Flag(bool),
    Text(String),
    Null,
}

/// One loosely structured observation record: named numeric or text fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation {
    fields: BTreeMap<String, ObservationValue>,
}

impl Observation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.fields
            .insert(name.to_string(), ObservationValue::Number(value));
        self
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields
            .insert(name.to_string(), ObservationValue::Text(value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ObservationValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, ObservationValue)> for Observation {
    fn from_iter<I: IntoIterator<Item = (String, ObservationValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyFinding {
    pub id: String,
    pub dimension: Dimension,
    pub severity: Severity,
    pub message: String,
    pub observed_value: f64,
    /// Cut point the observed value exceeded to reach `severity`.
    pub threshold: f64,
    pub source_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub findings: Vec<AnomalyFinding>,
    pub record_count: usize,
    pub evaluated_count: usize,
    pub skipped_count: usize,
}

impl AnomalyReport {
    pub fn count_with_severity(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }
}
