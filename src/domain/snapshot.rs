use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{ValidationError, ensure_finite, ensure_percent};

/// Plain, unvalidated snapshot fields as they arrive from a file or a
/// connector. Convert into a [`ProjectSnapshot`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshotRecord {
    pub project_name: String,
    pub planned_end_date: NaiveDate,
    pub current_progress: f64,
    pub planned_progress: f64,
    pub elapsed_days: i64,
    pub project_duration_days: i64,
    pub budget: f64,
    pub actual_cost: f64,
}

/// Validated progress and cost state of a project at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSnapshot {
    project_name: String,
    planned_end_date: NaiveDate,
    current_progress: f64,
    planned_progress: f64,
    elapsed_days: i64,
    project_duration_days: i64,
    budget: f64,
    actual_cost: f64,
}

impl ProjectSnapshot {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn planned_end_date(&self) -> NaiveDate {
        self.planned_end_date
    }

    pub fn current_progress(&self) -> f64 {
        self.current_progress
    }

    pub fn planned_progress(&self) -> f64 {
        self.planned_progress
    }

    pub fn elapsed_days(&self) -> i64 {
        self.elapsed_days
    }

    pub fn project_duration_days(&self) -> i64 {
        self.project_duration_days
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn actual_cost(&self) -> f64 {
        self.actual_cost
    }

    /// Days left on the baseline schedule. Negative once the project has
    /// overrun its planned duration.
    pub fn remaining_days(&self) -> i64 {
        self.project_duration_days - self.elapsed_days
    }

    pub fn to_record(&self) -> ProjectSnapshotRecord {
        ProjectSnapshotRecord {
            project_name: self.project_name.clone(),
            planned_end_date: self.planned_end_date,
            current_progress: self.current_progress,
            planned_progress: self.planned_progress,
            elapsed_days: self.elapsed_days,
            project_duration_days: self.project_duration_days,
            budget: self.budget,
            actual_cost: self.actual_cost,
        }
    }
}

impl TryFrom<ProjectSnapshotRecord> for ProjectSnapshot {
    type Error = ValidationError;

    fn try_from(record: ProjectSnapshotRecord) -> Result<Self, Self::Error> {
        let project_name = record.project_name.trim().to_string();
        if project_name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        let current_progress = ensure_percent("current_progress", record.current_progress)?;
        let planned_progress = ensure_percent("planned_progress", record.planned_progress)?;
        if record.elapsed_days < 0 {
            return Err(ValidationError::NegativeElapsedDays(record.elapsed_days));
        }
        if record.project_duration_days <= 0 {
            return Err(ValidationError::NonPositiveDuration(
                record.project_duration_days,
            ));
        }
        let budget = ensure_finite("budget", record.budget)?;
        if budget <= 0.0 {
            return Err(ValidationError::NonPositiveBudget(budget));
        }
        let actual_cost = ensure_finite("actual_cost", record.actual_cost)?;
        if actual_cost < 0.0 {
            return Err(ValidationError::NegativeActualCost(actual_cost));
        }

        Ok(Self {
            project_name,
            planned_end_date: record.planned_end_date,
            current_progress,
            planned_progress,
            elapsed_days: record.elapsed_days,
            project_duration_days: record.project_duration_days,
            budget,
            actual_cost,
        })
    }
}
