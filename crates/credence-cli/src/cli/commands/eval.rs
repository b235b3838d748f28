use super::super::args::EvalArgs;
use super::apply_client_args;
use crate::exit_codes::{CONFIG_ERROR, RUN_ABORTED, SUCCESS};
use credence_core::config::{load_config, RunConfig};
use credence_core::dataset::load_dataset;
use credence_core::engine::{RunStatus, Runner};
use credence_core::report::console::{format_header, print_report, progress_sink};
use credence_core::report::{write_summary, Palette, RunSummary};
use credence_core::{Classifier, ClientConfig, Label, OllamaClient};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_DATASET: &str = "dataset.csv";

/// Effective settings after layering flags, config file and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EvalSettings {
    pub dataset: PathBuf,
    pub critical: Label,
    pub client: ClientConfig,
}

pub(crate) fn resolve(args: &EvalArgs, file: Option<&RunConfig>, env: ClientConfig) -> EvalSettings {
    let client = match file.and_then(|f| f.client.as_ref()) {
        Some(partial) => partial.apply(env),
        None => env,
    };
    let dataset = args
        .dataset
        .clone()
        .or_else(|| file.and_then(|f| f.dataset.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));
    let critical = args
        .critical_label
        .or_else(|| file.and_then(|f| f.critical_label))
        .unwrap_or(Label::CRITICAL);
    EvalSettings {
        dataset,
        critical,
        client: apply_client_args(client, &args.client),
    }
}

pub async fn run(args: EvalArgs) -> anyhow::Result<i32> {
    let file_cfg = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(CONFIG_ERROR);
            }
        },
        None => None,
    };
    let env = match ClientConfig::from_env() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };
    let settings = resolve(&args, file_cfg.as_ref(), env);
    tracing::debug!(?settings, "resolved eval settings");

    let records = match load_dataset(&settings.dataset) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let client = match OllamaClient::new(settings.client.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let palette = Palette::detect(args.no_color);
    print!("{}", format_header(records.len(), client.model(), &palette));
    println!();

    let outcome = Runner::new(client.clone())
        .with_critical_label(settings.critical)
        .with_event_sink(progress_sink(palette))
        .run(&records)
        .await;

    if let RunStatus::Aborted { error, .. } = &outcome.status {
        eprintln!("{}", palette.failure(&format!("Run aborted: {error}")));
        if let Some(hint) = error.guidance() {
            eprintln!("{}", palette.warning(hint));
        }
    }

    print_report(&outcome, &palette);

    if let Some(path) = &args.json {
        let summary = RunSummary::from_outcome(&outcome, client.provider_name(), client.model());
        write_summary(&summary, path)?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(if outcome.status.is_aborted() {
        RUN_ABORTED
    } else {
        SUCCESS
    })
}
