//! HTTP client for an Ollama-style `/api/generate` endpoint.

use super::{Analyzer, Classifier};
use crate::analysis::{parse_assessment, CredibilityAssessment};
use crate::config::ClientConfig;
use crate::errors::{ClassifyError, ClassifyResult};
use crate::label::{extract_label, Label};
use crate::prompts;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT_VALUE: &str = concat!("credence/", env!("CARGO_PKG_VERSION"));

/// Body of a non-streamed generate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl GenerateRequest {
    /// Deterministic label request: temperature 0, nucleus sampling off.
    pub fn classification(model: &str, article: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompts::classification(article),
            stream: false,
            temperature: Some(0.0),
            top_p: Some(1.0),
            format: None,
        }
    }

    /// JSON-mode assessment request.
    pub fn analysis(model: &str, article: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompts::analysis(article),
            stream: false,
            temperature: None,
            top_p: None,
            format: Some("json".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for a single local model endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl OllamaClient {
    pub fn new(config: ClientConfig) -> ClassifyResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ClassifyError::Client {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and return the model's `response` text.
    pub async fn generate(&self, request: &GenerateRequest) -> ClassifyResult<String> {
        let endpoint = &self.config.endpoint;
        debug!(endpoint = %endpoint, model = %request.model, "sending generate request");

        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::from_status(status.as_u16(), body));
        }

        // A body that stalls or breaks off is a transport failure, not a bad answer.
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        let envelope: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ClassifyError::ResponseFormat {
                message: format!("failed to parse generate response: {}", e),
            })?;

        debug!(chars = envelope.response.len(), "received generate response");
        Ok(envelope.response)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClassifyError {
        if err.is_builder() {
            return ClassifyError::Client {
                message: format!("invalid request: {}", err),
            };
        }
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_body() || err.is_decode() {
            format!("failed to read response body: {}", err)
        } else {
            err.to_string()
        };
        ClassifyError::Connectivity {
            endpoint: self.config.endpoint.clone(),
            message,
        }
    }
}

#[async_trait]
impl Classifier for OllamaClient {
    async fn classify(&self, text: &str) -> ClassifyResult<Label> {
        let request = GenerateRequest::classification(&self.config.model, text);
        let response = self.generate(&request).await?;
        Ok(extract_label(&response))
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Analyzer for OllamaClient {
    async fn analyze(&self, text: &str) -> ClassifyResult<CredibilityAssessment> {
        let request = GenerateRequest::analysis(&self.config.model, text);
        let response = self.generate(&request).await?;
        parse_assessment(&response)
    }
}
