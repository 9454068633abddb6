mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use fare_core::config::FareGuideConfig;
use fare_core::contract::FareQuoteRequest;
use fare_core::discount::{DiscountConfig, InMemoryDiscountCards, NoDiscountCards};
use fare_core::orchestrator::RouteFareOrchestrator;
use fare_core::pricing::TariffConfig;

use crate::cli::{Cli, Command, QuoteArgs};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Quote(args) => quote(&config, args),
        Command::Tariff => print_json(&TariffView {
            tariff: config.tariff,
            discounts: config.discounts,
        }),
    }
}

fn load_config(path: Option<&Path>) -> Result<FareGuideConfig> {
    let config = match path {
        Some(path) => FareGuideConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => FareGuideConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn quote(config: &FareGuideConfig, args: QuoteArgs) -> Result<()> {
    let request = match &args.request {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading request {}", path.display()))?;
            serde_json::from_str::<FareQuoteRequest>(&raw)
                .with_context(|| format!("parsing request {}", path.display()))?
        }
        None => args.to_request()?,
    };

    let orchestrator = RouteFareOrchestrator::from_config(config);
    let response = match &args.cards {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading discount cards {}", path.display()))?;
            let cards = InMemoryDiscountCards::from_json(&raw)
                .with_context(|| format!("parsing discount cards {}", path.display()))?;
            tracing::debug!(cards = cards.len(), "discount cards loaded");
            orchestrator.quote(&request, &cards)?
        }
        None => orchestrator.quote(&request, &NoDiscountCards)?,
    };

    print_json(&response)
}

#[derive(Serialize)]
struct TariffView {
    tariff: TariffConfig,
    discounts: DiscountConfig,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
