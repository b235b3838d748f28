use super::{Analyzer, Classifier};
use crate::analysis::{parse_assessment, CredibilityAssessment};
use crate::errors::ClassifyResult;
use crate::label::{extract_label, Label};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted classifier. Each call consumes the next queued raw response (or
/// error); once the script is exhausted the fallback response is used.
#[derive(Debug)]
pub struct FakeClassifier {
    model: String,
    script: Mutex<VecDeque<ClassifyResult<String>>>,
    fallback: String,
    calls: AtomicUsize,
}

impl Default for FakeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClassifier {
    pub fn new() -> Self {
        Self {
            model: "fake".to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: String::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_fallback(mut self, response: impl Into<String>) -> Self {
        self.fallback = response.into();
        self
    }

    pub fn push_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()))
    }

    pub fn push_label(self, label: Label) -> Self {
        self.push(Ok(label.as_str().to_string()))
    }

    pub fn push_error(self, err: crate::errors::ClassifyError) -> Self {
        self.push(Err(err))
    }

    fn push(self, outcome: ClassifyResult<String>) -> Self {
        self.script
            .lock()
            .expect("fake script lock")
            .push_back(outcome);
        self
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> ClassifyResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("fake script lock")
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, _text: &str) -> ClassifyResult<Label> {
        self.next().map(|response| extract_label(&response))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Analyzer for FakeClassifier {
    async fn analyze(&self, _text: &str) -> ClassifyResult<CredibilityAssessment> {
        parse_assessment(&self.next()?)
    }
}
