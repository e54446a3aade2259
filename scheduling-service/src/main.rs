use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduling_service::{generate_schedule, load_config, parse_manual_holidays, resolve_holidays};
use shared::collect_config_issues;

fn print_usage() {
    eprintln!(
        "usage: scheduling-service <config.yaml> [--holidays YYYY-MM-DD,YYYY-MM-DD,...]\n\n\
         Reads a month's roster configuration, builds the duty schedule, and\n\
         writes the result to stdout as JSON."
    );
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(config_path) = args.get(1) else {
        print_usage();
        anyhow::bail!("missing required <config.yaml> argument");
    };

    let manual_holidays = match args.iter().position(|a| a == "--holidays") {
        Some(idx) => {
            let raw = args
                .get(idx + 1)
                .context("--holidays requires a comma-separated YYYY-MM-DD list")?;
            parse_manual_holidays(raw)?
        }
        None => Default::default(),
    };

    tracing::info!(%config_path, "loading configuration");
    let config = load_config(config_path).context("failed to load configuration")?;

    for issue in collect_config_issues(&config) {
        tracing::warn!("{issue}");
    }

    let holidays = resolve_holidays(config.year, config.month, &manual_holidays);
    tracing::info!(
        year = config.year,
        month = config.month,
        holidays_count = holidays.len(),
        "resolved holiday set"
    );

    let schedule = generate_schedule(&config, &holidays).context("failed to generate schedule")?;

    let json = serde_json::to_string_pretty(&schedule).context("failed to serialize schedule")?;
    println!("{json}");

    for warning in &schedule.warnings {
        tracing::warn!("{warning}");
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduling_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    run()
}
