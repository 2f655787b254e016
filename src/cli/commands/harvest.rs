//! Season harvest command handlers

use anyhow::Context;
use chrono::Datelike;
use std::sync::Arc;
use tracing::error;

use crate::clients::BangumiClient;
use crate::config::Config;
use crate::domain::{Season, SeasonKey};
use crate::services::season::{SaveOutcome, SeasonHarvester, SeasonReport};
use crate::store::Store;

fn build(config: &Config) -> anyhow::Result<(SeasonHarvester, Store)> {
    let client = Arc::new(
        BangumiClient::from_config(&config.bangumi).context("Failed to build Bangumi client")?,
    );
    let harvester = SeasonHarvester::from_config(client.clone(), client, &config.bangumi);
    let store = Store::new(config.output_dir());
    Ok((harvester, store))
}

fn print_result(key: SeasonKey, outcome: SaveOutcome, report: &SeasonReport) {
    match outcome {
        SaveOutcome::Saved { count } => println!(
            "✓ {key}: saved {count} anime ({} discovered, {} skipped)",
            report.discovered,
            report.skipped()
        ),
        SaveOutcome::SkippedEmpty => println!("• {key}: nothing found, not saved"),
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

async fn run_seasons(
    config: &Config,
    keys: impl IntoIterator<Item = SeasonKey>,
) -> anyhow::Result<()> {
    let (harvester, store) = build(config)?;

    let mut failures = 0;
    for key in keys {
        println!("Processing {key}...");
        match harvester.harvest_and_save(&store, key).await {
            Ok((outcome, report)) => print_result(key, outcome, &report),
            Err(e) => {
                error!(season = %key, error = %e, "Failed to save season");
                println!("✗ {key}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} season(s) could not be saved");
    }

    Ok(())
}

pub async fn cmd_season(config: &Config, year: i32, season: Season) -> anyhow::Result<()> {
    run_seasons(config, [SeasonKey::new(year, season)]).await
}

pub async fn cmd_current(config: &Config) -> anyhow::Result<()> {
    run_seasons(config, SeasonKey::seasons_of(current_year())).await
}

pub async fn cmd_history(config: &Config, from: Option<i32>) -> anyhow::Result<()> {
    let start = from.unwrap_or(config.history.start_year);
    let end = current_year();

    if start > end {
        anyhow::bail!("Start year {start} is after the current year {end}");
    }

    run_seasons(config, SeasonKey::range(start, end)).await
}
