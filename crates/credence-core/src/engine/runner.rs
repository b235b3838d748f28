use crate::dataset::EvaluationRecord;
use crate::errors::ClassifyError;
use crate::label::Label;
use crate::metrics::{ClassificationResult, ConfusionTable, RunReport};
use crate::providers::Classifier;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Why a single record could not be scored.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ItemError {
    #[error("invalid ground truth {value:?} (expected LOW_RISK, MEDIUM_RISK or HIGH_RISK)")]
    InvalidGroundTruth { value: String },

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl ItemError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Classify(e) if e.is_fatal())
    }
}

#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub record_id: String,
    pub error: ItemError,
}

/// Lifecycle of one record: Pending → Classifying → Scored | Failed.
#[derive(Debug, Clone)]
pub enum ItemState {
    Pending,
    Classifying,
    Scored(ClassificationResult),
    Failed(ItemFailure),
}

/// One state transition, with 1-based position in the dataset.
#[derive(Debug, Clone)]
pub struct ItemEvent {
    pub index: usize,
    pub total: usize,
    pub record_id: String,
    pub state: ItemState,
}

/// Receives every item transition in record order.
pub type EventSink = Arc<dyn Fn(&ItemEvent) + Send + Sync>;

#[derive(Debug, Clone)]
pub enum RunStatus {
    Completed,
    /// Halted by a fatal error; records after `record_id` were not processed.
    Aborted {
        record_id: String,
        error: ClassifyError,
    },
}

impl RunStatus {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub table: ConfusionTable,
    pub status: RunStatus,
    pub failures: Vec<ItemFailure>,
    /// Records that reached Classifying, in order.
    pub processed: usize,
}

/// Sequential evaluation driver. One request is in flight at a time and
/// results are recorded in dataset order.
pub struct Runner {
    classifier: Arc<dyn Classifier>,
    critical: Label,
    events: Option<EventSink>,
}

impl Runner {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            critical: Label::CRITICAL,
            events: None,
        }
    }

    pub fn with_critical_label(mut self, critical: Label) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    pub async fn run(&self, records: &[EvaluationRecord]) -> RunOutcome {
        let started = Instant::now();
        let total = records.len();
        let mut table = ConfusionTable::new();
        let mut failures = Vec::new();
        let mut status = RunStatus::Completed;
        let mut processed = 0;

        info!(
            records = total,
            provider = self.classifier.provider_name(),
            model = self.classifier.model(),
            "starting evaluation run"
        );

        for (i, record) in records.iter().enumerate() {
            let index = i + 1;
            self.emit(index, total, record, ItemState::Pending);

            let result = match record.truth_label() {
                Some(truth) => {
                    processed += 1;
                    self.emit(index, total, record, ItemState::Classifying);
                    self.score(&mut table, record, truth).await
                }
                None => Err(ItemError::InvalidGroundTruth {
                    value: record.ground_truth.clone(),
                }),
            };

            match result {
                Ok(scored) => {
                    debug!(record_id = %record.id, predicted = %scored.predicted, correct = scored.correct, "scored");
                    self.emit(index, total, record, ItemState::Scored(scored));
                }
                Err(error) => {
                    warn!(record_id = %record.id, error = %error, "item failed");
                    let fatal = error.is_fatal();
                    let failure = ItemFailure {
                        record_id: record.id.clone(),
                        error,
                    };
                    self.emit(index, total, record, ItemState::Failed(failure.clone()));
                    if let (true, ItemError::Classify(e)) = (fatal, &failure.error) {
                        status = RunStatus::Aborted {
                            record_id: record.id.clone(),
                            error: e.clone(),
                        };
                    }
                    failures.push(failure);
                    if status.is_aborted() {
                        warn!(record_id = %record.id, "aborting run on fatal error");
                        break;
                    }
                }
            }
        }

        let report = table.snapshot(self.critical, started.elapsed(), failures.len());
        info!(
            scored = report.total,
            failed = report.failed,
            aborted = status.is_aborted(),
            "evaluation run finished"
        );

        RunOutcome {
            report,
            table,
            status,
            failures,
            processed,
        }
    }

    async fn score(
        &self,
        table: &mut ConfusionTable,
        record: &EvaluationRecord,
        truth: Label,
    ) -> Result<ClassificationResult, ItemError> {
        let predicted = self.classifier.classify(&record.text).await?;
        table
            .record(truth, predicted)
            .map_err(|_| ItemError::InvalidGroundTruth {
                value: record.ground_truth.clone(),
            })?;
        Ok(ClassificationResult::new(&record.id, truth, predicted))
    }

    fn emit(&self, index: usize, total: usize, record: &EvaluationRecord, state: ItemState) {
        if let Some(sink) = &self.events {
            sink(&ItemEvent {
                index,
                total,
                record_id: record.id.clone(),
                state,
            });
        }
    }
}
