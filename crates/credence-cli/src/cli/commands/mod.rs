use super::args::*;

pub mod analyze;
pub mod eval;

use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Eval(args) => eval::run(args).await,
        Command::Analyze(args) => analyze::run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Layer CLI flags over a base client config.
pub(crate) fn apply_client_args(
    base: credence_core::ClientConfig,
    args: &ClientArgs,
) -> credence_core::ClientConfig {
    let mut cfg = base;
    if let Some(endpoint) = &args.endpoint {
        cfg = cfg.with_endpoint(endpoint.clone());
    }
    if let Some(model) = &args.model {
        cfg = cfg.with_model(model.clone());
    }
    if let Some(timeout) = args.timeout {
        cfg = cfg.with_timeout_secs(timeout);
    }
    cfg
}
