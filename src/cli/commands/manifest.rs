//! Manifest listing command handler

use crate::config::Config;
use crate::store::Store;

pub async fn cmd_manifest(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(config.output_dir());
    let entries = store.read_manifest().await;

    if entries.is_empty() {
        println!("No seasons recorded in {}.", store.root().display());
        println!();
        println!("Fetch one with: seasonarr season --year 2024 --season fall");
        return Ok(());
    }

    println!("Recorded seasons ({} total)", entries.len());
    println!("{:-<40}", "");

    for entry in &entries {
        println!("{:>6} {:<8} {:>5} anime", entry.year, entry.season, entry.count);
    }

    let total: usize = entries.iter().map(|e| e.count).sum();
    println!();
    println!("{total} anime across all seasons");

    Ok(())
}
