mod commands;
mod render;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dayplan_core::backing::FileStore;
use dayplan_core::config::PlanConfig;
use dayplan_core::{DateKey, MonthKey, Planner};

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(about = "Plan your days: entries per calendar date, saved locally")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the plan for a day
    Show {
        /// Date (YYYY-MM-DD, "today", "tomorrow" or "yesterday"). Defaults to today
        date: Option<String>,

        /// Print the day as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overview of a calendar month
    Month {
        /// Month (YYYY-MM, "next" or "prev"). Defaults to the current month
        month: Option<String>,
    },
    /// Add a blank entry to a day
    Add {
        date: Option<String>,

        /// Fill in the description right away
        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// Change one field of an entry
    Set {
        /// Date of the entry
        date: String,

        /// Entry number (as shown by `show`) or id
        entry: String,

        /// time, category, description or outcome
        field: String,

        value: String,
    },
    /// Remove an entry
    Remove {
        date: String,

        /// Entry number (as shown by `show`) or id
        entry: String,
    },
    /// Discard every entry of a day
    Clear {
        date: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Edit a day interactively
    Edit { date: Option<String> },
    /// Save now instead of waiting for autosave
    Save,
    /// Write a backup of all plans
    Export {
        /// Directory to write the backup to (defaults to export_dir from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Replace all plans with a backup file
    Import { file: PathBuf },
    /// Ask the advisory service about a day's plan
    Advise { date: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = PlanConfig::load()?;
    let mut planner = open_planner(&config)?;

    let result = match cli.command {
        Commands::Show { date, json } => commands::show::run(&planner, parse_date(date.as_deref())?, json),
        Commands::Month { month } => commands::month::run(&planner, parse_month(month.as_deref())?),
        Commands::Add {
            date,
            description,
            time,
            category,
        } => commands::add::run(
            &mut planner,
            parse_date(date.as_deref())?,
            description,
            time,
            category,
        ),
        Commands::Set {
            date,
            entry,
            field,
            value,
        } => commands::set::run(&mut planner, parse_date(Some(&date))?, &entry, &field, &value),
        Commands::Remove { date, entry } => {
            commands::remove::run(&mut planner, parse_date(Some(&date))?, &entry)
        }
        Commands::Clear { date, yes } => commands::clear::run(&mut planner, parse_date(Some(&date))?, yes),
        Commands::Edit { date } => {
            commands::edit::run(&mut planner, &config, parse_date(date.as_deref())?).await
        }
        Commands::Save => commands::save::run(&mut planner),
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_path());
            commands::export::run(&planner, &dir)
        }
        Commands::Import { file } => commands::import::run(&mut planner, &file).await,
        Commands::Advise { date } => {
            commands::advise::run(&planner, &config, parse_date(date.as_deref())?).await
        }
    };

    // Don't leave a debounced write behind when the process exits
    planner.flush().context("Failed to save plans")?;

    result
}

fn open_planner(config: &PlanConfig) -> Result<Planner> {
    let data_path = config.data_path()?;
    let backing = Arc::new(FileStore::new(data_path));
    Ok(Planner::open(backing, config.autosave()))
}

fn parse_date(input: Option<&str>) -> Result<DateKey> {
    let today = DateKey::today();

    let date = match input {
        None | Some("today") => today,
        Some("tomorrow") => DateKey::new(today.date() + chrono::Duration::days(1)),
        Some("yesterday") => DateKey::new(today.date() - chrono::Duration::days(1)),
        Some(s) => DateKey::parse(s)?,
    };

    Ok(date)
}

fn parse_month(input: Option<&str>) -> Result<MonthKey> {
    let current = MonthKey::current();

    let month = match input {
        None | Some("this") => current,
        Some("next") => current.next(),
        Some("prev") | Some("last") => current.prev(),
        Some(s) => MonthKey::parse(s)?,
    };

    Ok(month)
}
