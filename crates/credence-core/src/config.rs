//! Client and run configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CREDENCE_ENDPOINT` | Generate endpoint URL (default: `http://localhost:11434/api/generate`) |
//! | `CREDENCE_MODEL` | Model name (default: `llama3`) |
//! | `CREDENCE_TIMEOUT` | Per-request timeout in seconds (default: unbounded) |

use crate::errors::ConfigError;
use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Connection settings for the local model endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Generate endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables, falling back to defaults.
    ///
    /// A `CREDENCE_TIMEOUT` that is not a whole number of seconds is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs = match lookup("CREDENCE_TIMEOUT") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                field: "CREDENCE_TIMEOUT",
                message: format!("{raw:?} is not a number of seconds ({e})"),
            })?),
            None => None,
        };
        Ok(Self {
            endpoint: lookup("CREDENCE_ENDPOINT").unwrap_or_else(default_endpoint),
            model: lookup("CREDENCE_MODEL").unwrap_or_else(default_model),
            timeout_secs,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// On-disk run configuration (`credence.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub version: u32,

    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Label reported with precision/recall. Defaults to HIGH_RISK.
    #[serde(default)]
    pub critical_label: Option<Label>,

    #[serde(default)]
    pub client: Option<PartialClientConfig>,
}

/// Client overrides from a config file; unset fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialClientConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl PartialClientConfig {
    pub fn apply(&self, mut base: ClientConfig) -> ClientConfig {
        if let Some(endpoint) = &self.endpoint {
            base.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            base.model = model.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            base.timeout_secs = Some(timeout);
        }
        base
    }
}

/// Load and validate a run config file.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_config(&raw).map_err(|e| match e {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

fn parse_config(raw: &str) -> Result<RunConfig, ConfigError> {
    let cfg: RunConfig = serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse {
        path: PathBuf::new(),
        message: e.to_string(),
    })?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError::Version {
            found: cfg.version,
            supported: SUPPORTED_CONFIG_VERSION,
        });
    }
    if cfg.critical_label == Some(Label::Unknown) {
        return Err(ConfigError::Invalid {
            field: "critical_label",
            message: "must be one of LOW_RISK, MEDIUM_RISK, HIGH_RISK".into(),
        });
    }
    Ok(cfg)
}
