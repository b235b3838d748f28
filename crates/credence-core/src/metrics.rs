//! Confusion table and derived run metrics.

use crate::errors::MetricsError;
use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

const KNOWN: usize = Label::KNOWN.len();
const ALL: usize = Label::ALL.len();

/// Outcome of scoring one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub record_id: String,
    pub truth: Label,
    pub predicted: Label,
    pub correct: bool,
}

impl ClassificationResult {
    pub fn new(record_id: impl Into<String>, truth: Label, predicted: Label) -> Self {
        Self {
            record_id: record_id.into(),
            truth,
            predicted,
            correct: truth == predicted,
        }
    }
}

/// Per-true-label counts. Rows are the known labels, columns every label
/// including `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionTable {
    predicted_as: [[u64; ALL]; KNOWN],
}

impl ConfusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one scored item.
    pub fn record(&mut self, truth: Label, predicted: Label) -> Result<(), MetricsError> {
        if !truth.is_known() {
            return Err(MetricsError::UnknownTruth);
        }
        self.predicted_as[truth.index()][predicted.index()] += 1;
        Ok(())
    }

    /// Items whose truth is `truth`.
    pub fn total(&self, truth: Label) -> u64 {
        self.row(truth).map(|row| row.iter().sum()).unwrap_or(0)
    }

    /// Items whose truth is `truth` and were predicted as such.
    pub fn correct(&self, truth: Label) -> u64 {
        self.predicted_as(truth, truth)
    }

    pub fn predicted_as(&self, truth: Label, predicted: Label) -> u64 {
        self.row(truth).map(|row| row[predicted.index()]).unwrap_or(0)
    }

    /// Items predicted as `label`, across all truths.
    pub fn predicted_total(&self, label: Label) -> u64 {
        self.predicted_as.iter().map(|row| row[label.index()]).sum()
    }

    pub fn total_count(&self) -> u64 {
        Label::KNOWN.iter().map(|l| self.total(*l)).sum()
    }

    pub fn correct_count(&self) -> u64 {
        Label::KNOWN.iter().map(|l| self.correct(*l)).sum()
    }

    fn row(&self, truth: Label) -> Option<&[u64; ALL]> {
        self.predicted_as.get(truth.index())
    }

    /// Overall accuracy in `0.0..=1.0`; `None` before anything was recorded.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total_count();
        (total > 0).then(|| self.correct_count() as f64 / total as f64)
    }

    /// Precision/recall for one label. Zero denominators yield `0.0`.
    pub fn class_metrics(&self, label: Label) -> ClassMetrics {
        let true_positives = self.correct(label);
        let predicted = self.predicted_total(label);
        let support = self.total(label);
        ClassMetrics {
            label,
            true_positives,
            predicted,
            support,
            precision: ratio(true_positives, predicted),
            recall: ratio(true_positives, support),
        }
    }

    /// Read-only report over the current counts.
    pub fn snapshot(&self, critical: Label, elapsed: Duration, failed: usize) -> RunReport {
        RunReport {
            total: self.total_count(),
            correct: self.correct_count(),
            failed,
            accuracy: self.accuracy(),
            critical: self.class_metrics(critical),
            per_class: Label::KNOWN
                .iter()
                .map(|l| self.class_metrics(*l))
                .collect(),
            elapsed_secs: elapsed.as_secs_f64(),
            confusion: self.rows(),
        }
    }

    /// Table broken out by true label.
    pub fn rows(&self) -> Vec<ConfusionRow> {
        Label::KNOWN
            .iter()
            .map(|truth| ConfusionRow {
                truth: *truth,
                total: self.total(*truth),
                correct: self.correct(*truth),
                predicted_as: Label::ALL
                    .iter()
                    .map(|p| (*p, self.predicted_as(*truth, *p)))
                    .collect(),
            })
            .collect()
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// One confusion table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionRow {
    pub truth: Label,
    pub total: u64,
    pub correct: u64,
    pub predicted_as: BTreeMap<Label, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub true_positives: u64,
    /// Items predicted as this label.
    pub predicted: u64,
    /// Items whose truth is this label.
    pub support: u64,
    pub precision: f64,
    pub recall: f64,
}

/// Final metrics for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Items scored (excludes failed items).
    pub total: u64,
    pub correct: u64,
    /// Items that failed classification or had an invalid ground truth.
    pub failed: usize,
    pub accuracy: Option<f64>,
    pub critical: ClassMetrics,
    pub per_class: Vec<ClassMetrics>,
    pub elapsed_secs: f64,
    pub confusion: Vec<ConfusionRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::*;

    fn table(pairs: &[(Label, Label)]) -> ConfusionTable {
        let mut t = ConfusionTable::new();
        for (truth, predicted) in pairs {
            t.record(*truth, *predicted).unwrap();
        }
        t
    }

    #[test]
    fn empty_table_has_no_accuracy_and_zero_sentinels() {
        let t = ConfusionTable::new();
        assert_eq!(t.accuracy(), None);
        let m = t.class_metrics(HighRisk);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
    }

    #[test]
    fn record_updates_total_correct_and_cell() {
        let t = table(&[(LowRisk, LowRisk), (LowRisk, Unknown), (MediumRisk, HighRisk)]);
        assert_eq!(t.total(LowRisk), 2);
        assert_eq!(t.correct(LowRisk), 1);
        assert_eq!(t.predicted_as(LowRisk, Unknown), 1);
        assert_eq!(t.total(MediumRisk), 1);
        assert_eq!(t.correct(MediumRisk), 0);
        assert_eq!(t.total(HighRisk), 0);
    }

    #[test]
    fn rows_sum_to_totals() {
        let t = table(&[
            (LowRisk, LowRisk),
            (LowRisk, HighRisk),
            (MediumRisk, Unknown),
            (HighRisk, HighRisk),
            (HighRisk, MediumRisk),
            (HighRisk, HighRisk),
        ]);
        for row in t.rows() {
            assert_eq!(row.predicted_as.values().sum::<u64>(), row.total);
            assert_eq!(row.predicted_as[&row.truth], row.correct);
        }
        assert_eq!(t.total_count(), 6);
        assert_eq!(t.accuracy(), Some(3.0 / 6.0));
    }

    #[test]
    fn unknown_truth_is_rejected_without_mutation() {
        let mut t = ConfusionTable::new();
        assert_eq!(t.record(Unknown, LowRisk), Err(MetricsError::UnknownTruth));
        assert_eq!(t, ConfusionTable::new());
    }

    #[test]
    fn precision_zero_when_class_never_predicted() {
        let t = table(&[(HighRisk, LowRisk), (HighRisk, Unknown)]);
        let m = t.class_metrics(HighRisk);
        assert_eq!(m.predicted, 0);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.support, 2);
    }

    #[test]
    fn recall_zero_when_class_never_true() {
        let t = table(&[(LowRisk, HighRisk)]);
        let m = t.class_metrics(HighRisk);
        assert_eq!(m.support, 0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.precision, 0.0);
    }

    #[test]
    fn four_row_scenario() {
        let t = table(&[
            (LowRisk, LowRisk),
            (MediumRisk, HighRisk),
            (HighRisk, HighRisk),
            (HighRisk, Unknown),
        ]);
        let report = t.snapshot(HighRisk, Duration::from_millis(1500), 0);
        assert_eq!(report.accuracy, Some(0.5));
        assert_eq!(report.critical.recall, 0.5);
        assert_eq!(report.critical.precision, 0.5);
        assert_eq!(report.total, 4);
        assert_eq!(report.correct, 2);
        assert_eq!(report.elapsed_secs, 1.5);
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let t = table(&[(LowRisk, LowRisk)]);
        let before = t.clone();
        let _ = t.snapshot(HighRisk, Duration::ZERO, 3);
        assert_eq!(t, before);
    }
}
