use clap::{Args, Parser, Subcommand};
use credence_core::Label;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "credence",
    version,
    about = "Evaluate a local LLM as a news credibility-risk classifier"
)]
pub struct Cli {
    /// Debug logging to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify every row of a labeled dataset and report accuracy
    Eval(EvalArgs),
    /// Score a single article and print the JSON reply
    Analyze(AnalyzeArgs),
    Version,
}

/// Endpoint overrides shared by every command that talks to the model.
/// Unset flags fall through to the config file, then `CREDENCE_*` variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Generate endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Labeled CSV (id,text,ground_truth). Falls back to the config file, then dataset.csv
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Run config (credence.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub client: ClientArgs,

    /// Class reported with precision/recall
    #[arg(long, value_parser = parse_known_label)]
    pub critical_label: Option<Label>,

    /// Also write the report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Read the article from a file ("-" for stdin)
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub client: ClientArgs,

    /// Article text; stdin is read when neither TEXT nor --file is given
    pub text: Vec<String>,
}

fn parse_known_label(raw: &str) -> Result<Label, String> {
    match raw.parse::<Label>() {
        Ok(label) if label.is_known() => Ok(label),
        Ok(label) => Err(format!("{label} cannot be the critical label")),
        Err(e) => Err(e.to_string()),
    }
}
