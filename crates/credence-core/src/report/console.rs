use crate::engine::{EventSink, ItemEvent, ItemState, RunOutcome, RunStatus};
use crate::label::Label;
use crate::metrics::RunReport;
use crate::report::style::Palette;
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;

/// Run header printed before the first item.
#[must_use]
pub fn format_header(records: usize, model: &str, palette: &Palette) -> String {
    format!(
        "{}\n\nLoaded dataset with {} examples.\nModel: {}, Temperature: {} (Deterministic)\n",
        palette.accent(&palette.bold("Starting News Credibility Evaluation...")),
        palette.bold(&records.to_string()),
        palette.warning(model),
        palette.warning("0"),
    )
}

/// Text written for one item transition. `Pending` opens the line, the
/// terminal states close it; `Classifying` writes nothing.
#[must_use]
pub fn format_item_event(ev: &ItemEvent, palette: &Palette) -> Option<String> {
    match &ev.state {
        ItemState::Pending => Some(format!(
            "Processing {}/{}: ID {}... ",
            ev.index, ev.total, ev.record_id
        )),
        ItemState::Classifying => None,
        ItemState::Scored(result) if result.correct => Some(format!("{}\n", palette.success("✓"))),
        ItemState::Scored(result) => Some(format!(
            "{}\n",
            palette.failure(&format!(
                "✗ (Pred: {} | True: {})",
                result.predicted, result.truth
            ))
        )),
        ItemState::Failed(failure) => Some(format!(
            "\n{}\n",
            palette.failure(&format!(
                "Error processing ID {}: {}",
                failure.record_id, failure.error
            ))
        )),
    }
}

/// Sink printing per-item progress to stdout.
pub fn progress_sink(palette: Palette) -> EventSink {
    Arc::new(move |ev: &ItemEvent| {
        if let Some(text) = format_item_event(ev, &palette) {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    })
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Summary block: elapsed time, counts, accuracy, critical precision/recall.
#[must_use]
pub fn format_summary(report: &RunReport, status: &RunStatus, palette: &Palette) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n{}", palette.bold("--- EVALUATION RESULTS ---"));
    if let RunStatus::Aborted { record_id, .. } = status {
        let _ = writeln!(
            s,
            "{}",
            palette.warning(&format!("Run aborted at ID {} (partial results)", record_id))
        );
    }
    let _ = writeln!(s, "Time taken: {:.2}s", report.elapsed_secs);
    let _ = writeln!(s, "Total Articles: {}", report.total);
    if report.failed > 0 {
        let _ = writeln!(s, "Failed Articles: {}", report.failed);
    }
    let accuracy = report
        .accuracy
        .map(percent)
        .unwrap_or_else(|| "n/a".into());
    let _ = writeln!(s, "Accuracy: {}", palette.success(&accuracy));
    let name = title_case(report.critical.label);
    let _ = writeln!(s, "{} Precision: {}", name, percent(report.critical.precision));
    let _ = writeln!(s, "{} Recall: {}", name, percent(report.critical.recall));
    s
}

fn title_case(label: Label) -> String {
    let short = label.short_name();
    let mut chars = short.chars();
    let head = chars.next().map(|c| c.to_string()).unwrap_or_default();
    format!("{}{} Risk", head, chars.as_str().to_lowercase())
}

/// Confusion matrix keyed by true label (rows) × predicted label (columns).
#[must_use]
pub fn format_confusion_matrix(report: &RunReport, palette: &Palette) -> String {
    const ROW_HEADER_WIDTH: usize = 16;
    let mut s = String::new();
    let _ = writeln!(s, "\n{}", palette.bold("Confusion Matrix:"));

    let _ = write!(s, "{:<width$}", "", width = ROW_HEADER_WIDTH);
    for label in Label::ALL {
        let _ = write!(s, " {:>13}", label.as_str());
    }
    s.push('\n');

    for row in &report.confusion {
        let header = format!("Actual {}", row.truth.short_name());
        let _ = write!(s, "{:<width$}", header, width = ROW_HEADER_WIDTH);
        for label in Label::ALL {
            let count = row.predicted_as.get(&label).copied().unwrap_or(0);
            let _ = write!(s, " {:>13}", count);
        }
        s.push('\n');
    }
    s
}

/// Print the full end-of-run report to stdout.
pub fn print_report(outcome: &RunOutcome, palette: &Palette) {
    print!("{}", format_summary(&outcome.report, &outcome.status, palette));
    print!("{}", format_confusion_matrix(&outcome.report, palette));
}
