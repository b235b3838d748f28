use super::super::args::AnalyzeArgs;
use super::apply_client_args;
use crate::exit_codes::{ANALYSIS_FAILED, CONFIG_ERROR, SUCCESS};
use anyhow::Context;
use credence_core::analysis::{handle_request, AnalysisReply, ExtensionRequest};
use credence_core::{ClientConfig, OllamaClient};
use std::path::Path;

fn read_text(args: &AnalyzeArgs) -> anyhow::Result<String> {
    match &args.file {
        Some(path) if path == Path::new("-") => {
            std::io::read_to_string(std::io::stdin()).context("failed to read stdin")
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None if !args.text.is_empty() => Ok(args.text.join(" ")),
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin"),
    }
}

/// Text and client for one request, or the message to report when they
/// cannot be set up.
fn prepare(args: &AnalyzeArgs) -> Result<(String, OllamaClient), String> {
    let text = read_text(args).map_err(|e| format!("{e:#}"))?;
    if text.trim().is_empty() {
        return Err("no article text given".to_string());
    }
    let base = ClientConfig::from_env().map_err(|e| e.to_string())?;
    let client = OllamaClient::new(apply_client_args(base, &args.client)).map_err(|e| e.to_string())?;
    Ok((text, client))
}

fn print_reply(reply: &AnalysisReply) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(reply)?);
    Ok(())
}

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<i32> {
    let (text, client) = match prepare(&args) {
        Ok(ready) => ready,
        Err(message) => {
            tracing::warn!(%message, "analyze input rejected");
            print_reply(&AnalysisReply::failure(message))?;
            return Ok(CONFIG_ERROR);
        }
    };

    let reply = handle_request(&client, ExtensionRequest::AnalyzeText { text }).await;
    print_reply(&reply)?;

    Ok(if reply.success { SUCCESS } else { ANALYSIS_FAILED })
}
