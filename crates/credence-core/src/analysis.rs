//! Per-page credibility analysis: the request/reply pair exchanged with the
//! browser extension.

use crate::errors::{ClassifyError, ClassifyResult};
use crate::label::Label;
use crate::providers::Analyzer;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Coarse risk level as reported by the analysis prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl From<RiskLevel> for Label {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Label::LowRisk,
            RiskLevel::Medium => Label::MediumRisk,
            RiskLevel::High => Label::HighRisk,
        }
    }
}

/// Structured model output for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityAssessment {
    /// 0 (fake/misleading) to 100 (highly credible).
    pub score: f64,
    pub risk: RiskLevel,
    pub explanation: String,
}

/// Parse the model's JSON-mode output.
pub fn parse_assessment(response: &str) -> ClassifyResult<CredibilityAssessment> {
    let assessment: CredibilityAssessment =
        serde_json::from_str(response.trim()).map_err(|e| ClassifyError::ResponseFormat {
            message: format!("model output is not a valid assessment: {}", e),
        })?;
    if !(0.0..=100.0).contains(&assessment.score) {
        return Err(ClassifyError::ResponseFormat {
            message: format!("score {} outside 0..=100", assessment.score),
        });
    }
    Ok(assessment)
}

/// Messages the extension sends to the background worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ExtensionRequest {
    AnalyzeText { text: String },
}

/// Reply envelope: `{success: true, data}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CredibilityAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReply {
    pub fn from_result(result: ClassifyResult<CredibilityAssessment>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self::failure(e.to_string()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Answer one extension request. Failures are folded into the reply.
pub async fn handle_request(analyzer: &dyn Analyzer, request: ExtensionRequest) -> AnalysisReply {
    match request {
        ExtensionRequest::AnalyzeText { text } => {
            let result = analyzer.analyze(&text).await;
            if let Err(e) = &result {
                warn!(error = %e, "analysis failed");
            }
            AnalysisReply::from_result(result)
        }
    }
}
