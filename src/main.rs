use anyhow::Context;
use clap::Parser;
use lifestreet_adapter::utils::{logger, validation::Validate};
use lifestreet_adapter::{Adapter, CallContext, CliConfig, ConfigProvider, LifestreetAdapter};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let toml = cli.toml_config()?;

    let json_logs = cli.json_logs || toml.as_ref().is_some_and(|t| t.json_logs());
    if let Some(level) = toml.as_ref().and_then(|t| t.log_level()) {
        if std::env::var_os("RUST_LOG").is_none() {
            std::env::set_var("RUST_LOG", level);
        }
    }
    if json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lifestreet-bid");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config: &dyn ConfigProvider = match &toml {
        Some(toml) => {
            toml.validate()?;
            toml
        }
        None => {
            cli.validate()?;
            &cli
        }
    };

    let adapter = LifestreetAdapter::from_config(config)?;
    let request = cli
        .read_request()
        .with_context(|| format!("reading {}", cli.request.display()))?;

    let ctx = match config.request_timeout() {
        Some(timeout) => CallContext::with_timeout(timeout),
        None => CallContext::new(),
    };
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding bid requests");
            interrupt.cancel();
        }
    });

    tracing::info!(
        "Requesting bids for {} ad units from {}",
        request.ad_units.len(),
        adapter.endpoint()
    );

    let mut debug = Vec::new();
    let outcome = adapter.call(&ctx, &request, &mut debug).await;

    let bids = match outcome {
        Ok(bids) => bids,
        Err(e) => {
            tracing::error!("❌ Bid request failed: {}", e);
            if !debug.is_empty() {
                println!("{}", serde_json::to_string_pretty(&json!({ "debug": debug }))?);
            }
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Received {} bids", bids.len());
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "bids": bids, "debug": debug }))?
    );

    Ok(())
}
