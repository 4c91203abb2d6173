//! Print goal cards (target, pace, actual) for a reference date
//!
//! Loads each configured source once and prints one line per goal,
//! or the full card data as JSON.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use goal_projection::{
    compute_goal_progress, format_abbreviated, format_percent, DashboardConfig, GoalProgress, GoalSeries,
    SeriesCache,
};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "goal_cards", about = "Target vs pace vs actual for every configured goal", version)]
struct Cli {
    /// Dashboard configuration file (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// SQLite database to use for every sqlite source
    #[arg(long)]
    db: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let mut config = DashboardConfig::from_path(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(db) = &cli.db {
        let changed = config.override_database(db);
        info!("Using {} for {} sqlite sources", db.display(), changed);
    }

    let reference_date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let empty = GoalSeries::default();
    let mut cache = SeriesCache::new();
    let mut cards: Vec<GoalProgress> = Vec::with_capacity(config.goals.len());

    for entry in &config.goals {
        let source = config
            .source_for(entry)
            .with_context(|| format!("goal '{}' has no source", entry.goal.name))?;

        // A source that fails to load renders as an all-zero card
        let progress = match cache.get_or_load(source) {
            Ok(series) => compute_goal_progress(series, reference_date, &entry.goal),
            Err(err) => {
                warn!("Source '{}' for goal '{}' failed to load: {}", entry.source, entry.goal.name, err);
                compute_goal_progress(&empty, reference_date, &entry.goal)
            }
        };
        cards.push(progress);
    }

    info!("Computed {} cards from {} sources in {:?}", cards.len(), cache.len(), start.elapsed());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    let style = &config.currency;
    println!("Goal cards as of {}", reference_date);
    println!("{:<28} {:<14} {:<14} {:<14} {:<14} {:<8} {:<10}",
             "Goal", "Target", "Projected", "Pace", "Actual", "Done", "Status");

    for card in &cards {
        println!("{:<28} {:<14} {:<14} {:<14} {:<14} {:<8} {:<10}",
                 card.name,
                 format_abbreviated(card.objective_total, style),
                 format_abbreviated(card.projected_value, style),
                 format_abbreviated(card.pace_value, style),
                 format_abbreviated(card.actual_to_date, style),
                 format_percent(card.completion(), style),
                 format!("{:?}", card.status));
    }

    Ok(())
}
