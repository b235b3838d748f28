pub mod fake;
pub mod ollama;

use crate::analysis::CredibilityAssessment;
use crate::errors::ClassifyResult;
use crate::label::Label;
use async_trait::async_trait;

pub use fake::FakeClassifier;
pub use ollama::{GenerateRequest, OllamaClient};

/// Assigns one risk label to an article.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one article. `Label::Unknown` is a valid answer; errors mean
    /// no label could be obtained at all.
    async fn classify(&self, text: &str) -> ClassifyResult<Label>;

    fn provider_name(&self) -> &'static str;

    fn model(&self) -> &str;
}

/// Produces a structured credibility assessment for a page.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> ClassifyResult<CredibilityAssessment>;
}
