//! Machine-readable run summary written with `--json`.

use crate::engine::{RunOutcome, RunStatus};
use crate::metrics::RunReport;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current schema version for the JSON summary.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub generated_at: String,
    pub provider: String,
    pub model: String,
    /// "completed" or "aborted".
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    pub report: RunReport,
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub record_id: String,
    pub message: String,
}

impl RunSummary {
    pub fn from_outcome(outcome: &RunOutcome, provider: &str, model: &str) -> Self {
        let (status, aborted_at, abort_reason) = match &outcome.status {
            RunStatus::Completed => ("completed", None, None),
            RunStatus::Aborted { record_id, error } => {
                ("aborted", Some(record_id.clone()), Some(error.to_string()))
            }
        };
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            provider: provider.to_string(),
            model: model.to_string(),
            status: status.to_string(),
            aborted_at,
            abort_reason,
            report: outcome.report.clone(),
            failures: outcome
                .failures
                .iter()
                .map(|f| FailureEntry {
                    record_id: f.record_id.clone(),
                    message: f.error.to_string(),
                })
                .collect(),
        }
    }
}

pub fn write_summary(summary: &RunSummary, out: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(out, json)?;
    Ok(())
}
