//! Evaluation dataset: `id,text,ground_truth` rows.
//!
//! The format is lightly structured rather than strict CSV. Each data line is
//! split at its first and last comma, so the text column may contain commas
//! whether or not it is quoted.

use crate::errors::DatasetError;
use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One labeled example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: String,
    pub text: String,
    /// Raw ground-truth cell; validated by [`EvaluationRecord::truth_label`].
    pub ground_truth: String,
}

impl EvaluationRecord {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        ground_truth: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ground_truth: ground_truth.into(),
        }
    }

    /// Ground truth as a known label, or `None` if the cell is not one.
    pub fn truth_label(&self) -> Option<Label> {
        Label::from_truth(&self.ground_truth)
    }

    /// Serialize back into a data row. The text is always quoted with inner
    /// quotes doubled, so [`parse_dataset`] reproduces this record.
    pub fn to_row(&self) -> String {
        format!(
            "{},\"{}\",{}",
            self.id,
            self.text.replace('"', "\"\""),
            self.ground_truth
        )
    }
}

/// Header line written by [`to_dataset`].
pub const HEADER: &str = "id,text,ground_truth";

/// Parse dataset text into records, preserving input order.
///
/// The first non-blank line is a header and is discarded. Lines without two
/// distinct commas are dropped.
pub fn parse_dataset(raw: &str) -> Vec<EvaluationRecord> {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                debug!(line = %line, "dropping row with fewer than 3 fields");
            }
            parsed
        })
        .collect()
}

fn parse_line(line: &str) -> Option<EvaluationRecord> {
    let first = line.find(',')?;
    let last = line.rfind(',')?;
    if last <= first {
        return None;
    }

    let id = &line[..first];
    let ground_truth = line[last + 1..].replace('"', "");
    let raw_text = &line[first + 1..last];

    Some(EvaluationRecord {
        id: id.to_string(),
        text: unquote(raw_text),
        ground_truth: ground_truth.trim().to_string(),
    })
}

fn unquote(raw: &str) -> String {
    let inner = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    inner.replace("\"\"", "\"")
}

/// Render records as dataset text with a header line.
pub fn to_dataset(records: &[EvaluationRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&record.to_row());
        out.push('\n');
    }
    out
}

/// Read and parse a dataset file.
pub fn load_dataset(path: &Path) -> Result<Vec<EvaluationRecord>, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DatasetError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let records = parse_dataset(&raw);
    debug!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}
