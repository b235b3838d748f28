//! Risk labels and label extraction from free-text model output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk label assigned to an article.
///
/// `Unknown` is a sentinel for classifier output that contained none of the
/// known tokens. A validated ground truth is never `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "LOW_RISK")]
    LowRisk,
    #[serde(rename = "MEDIUM_RISK")]
    MediumRisk,
    #[serde(rename = "HIGH_RISK")]
    HighRisk,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Label {
    /// Labels a ground truth may take, in extraction precedence order.
    pub const KNOWN: [Label; 3] = [Label::LowRisk, Label::MediumRisk, Label::HighRisk];

    /// Every value a prediction may take.
    pub const ALL: [Label; 4] = [
        Label::LowRisk,
        Label::MediumRisk,
        Label::HighRisk,
        Label::Unknown,
    ];

    /// Label tracked for precision/recall in the run summary.
    pub const CRITICAL: Label = Label::HighRisk;

    pub fn as_str(self) -> &'static str {
        match self {
            Label::LowRisk => "LOW_RISK",
            Label::MediumRisk => "MEDIUM_RISK",
            Label::HighRisk => "HIGH_RISK",
            Label::Unknown => "UNKNOWN",
        }
    }

    /// Short form used for confusion matrix row headers.
    pub fn short_name(self) -> &'static str {
        match self {
            Label::LowRisk => "LOW",
            Label::MediumRisk => "MEDIUM",
            Label::HighRisk => "HIGH",
            Label::Unknown => "UNKNOWN",
        }
    }

    /// Dense index into [`Label::ALL`].
    pub fn index(self) -> usize {
        match self {
            Label::LowRisk => 0,
            Label::MediumRisk => 1,
            Label::HighRisk => 2,
            Label::Unknown => 3,
        }
    }

    pub fn is_known(self) -> bool {
        self != Label::Unknown
    }

    /// Parse a ground-truth cell. Only the three known tokens are accepted.
    pub fn from_truth(raw: &str) -> Option<Label> {
        match raw.parse::<Label>() {
            Ok(label) if label.is_known() => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized label: {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOW_RISK" => Ok(Label::LowRisk),
            "MEDIUM_RISK" => Ok(Label::MediumRisk),
            "HIGH_RISK" => Ok(Label::HighRisk),
            "UNKNOWN" => Ok(Label::Unknown),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// Extract a label from a model response.
///
/// Tokens are checked in the fixed order LOW_RISK, MEDIUM_RISK, HIGH_RISK and
/// the first one present anywhere in the text wins, independent of where it
/// occurs. Extra commentary around the token is tolerated.
pub fn extract_label(response: &str) -> Label {
    let text = response.trim();
    Label::KNOWN
        .into_iter()
        .find(|label| text.contains(label.as_str()))
        .unwrap_or(Label::Unknown)
}
