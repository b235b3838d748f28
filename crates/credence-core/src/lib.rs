//! Evaluation harness for locally hosted LLM credibility-risk classifiers.
//!
//! A run parses a labeled dataset, sends each article to a local generate
//! endpoint one at a time, normalizes the free-text answer into a [`Label`],
//! and aggregates a confusion table with accuracy and precision/recall for
//! the critical class.
//!
//! ```no_run
//! use credence_core::{dataset, ClientConfig, OllamaClient, Runner};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let records = dataset::load_dataset("dataset.csv".as_ref())?;
//! let client = OllamaClient::new(ClientConfig::from_env()?)?;
//! let outcome = Runner::new(Arc::new(client)).run(&records).await;
//! println!("accuracy: {:?}", outcome.report.accuracy);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod label;
pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod report;

pub use config::{ClientConfig, RunConfig};
pub use dataset::EvaluationRecord;
pub use engine::{RunOutcome, RunStatus, Runner};
pub use errors::{ClassifyError, ClassifyResult, ConfigError, DatasetError};
pub use label::Label;
pub use metrics::{ConfusionTable, RunReport};
pub use providers::{Analyzer, Classifier, OllamaClient};
