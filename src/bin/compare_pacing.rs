//! Compare recorded actuals with calendar-day and business-day pacing
//!
//! Prints one line per day for a single goal so disagreements between the
//! two pacing strategies (and the recorded series) can be traced to a date.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use goal_projection::series::load_series;
use goal_projection::{lookup_value_as_of, DashboardConfig, PacingStrategy, ProjectionQuery};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "compare_pacing", about = "Day-by-day actual vs calendar and business-day pace for one goal")]
struct Cli {
    /// Dashboard configuration file (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Goal name as written in the config
    #[arg(short, long)]
    goal: String,

    /// First day to print, defaults to the start of the goal's period
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to print, defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,

    /// SQLite database to use for every sqlite source
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = DashboardConfig::from_path(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(db) = &cli.db {
        config.override_database(db);
    }

    let Some(entry) = config.goal(&cli.goal) else {
        bail!("no goal named '{}' in {}", cli.goal, cli.config.display());
    };
    let source = config
        .source_for(entry)
        .with_context(|| format!("goal '{}' has no source", entry.goal.name))?;
    let series = load_series(source).with_context(|| format!("loading source '{}'", entry.source))?;

    let to = cli.to.unwrap_or_else(|| Local::now().date_naive());
    let from = cli.from.unwrap_or_else(|| entry.goal.period_for(to).0);
    if to < from {
        bail!("--to {} is before --from {}", to, from);
    }

    println!("{} ({} rows, {} to {})",
             entry.goal.name,
             series.len(),
             series.first_date().map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
             series.last_date().map(|d| d.to_string()).unwrap_or_else(|| "-".into()));
    println!("{:<12} {:<18} {:<18} {:<18} {:<18} {:<18}",
             "Date", "Actual", "CalendarPace", "BusinessPace", "Diff", "Actual-Cal");

    for day in from.iter_days().take_while(|day| *day <= to) {
        let query = ProjectionQuery::for_goal(&series, day, &entry.goal);
        let calendar = ProjectionQuery { pacing: PacingStrategy::CalendarDay, ..query }.project();
        let business = ProjectionQuery { pacing: PacingStrategy::BusinessDay, ..query }.project();
        let actual = lookup_value_as_of(&series, day, &entry.goal.value_field);

        println!("{:<12} {:<18.2} {:<18.2} {:<18.2} {:<18.2} {:<18.2}",
                 day.to_string(),
                 actual,
                 calendar.projected_pace_value,
                 business.projected_pace_value,
                 calendar.projected_pace_value - business.projected_pace_value,
                 actual - calendar.projected_pace_value);
    }

    Ok(())
}
