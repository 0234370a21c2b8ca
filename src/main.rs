mod commands;
mod render;

use anyhow::Result;
use calboard_core::config::CalboardConfig;
use calboard_core::store::HttpEventStore;
use calboard_core::{CalendarViewModel, MonthCursor};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calboard")]
#[command(about = "Browse and edit the events of a remote calendar store, one month at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every event of a month
    Month {
        /// Any date inside the month (YYYY-MM-DD). Defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Move forward this many months
        #[arg(long, conflicts_with = "prev", value_parser = months_arg())]
        next: Option<i32>,

        /// Move back this many months
        #[arg(long, value_parser = months_arg())]
        prev: Option<i32>,
    },
    /// Show the events of a single day
    Day {
        /// Day to show (YYYY-MM-DD)
        date: String,
    },
    /// Show full details of an event
    Show { id: String },
    /// Create an event
    Add {
        /// Day of the event (YYYY-MM-DD)
        date: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        location: Option<String>,

        /// Start time (HH:MM)
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(long)]
        end: Option<String>,
    },
    /// Change an existing event. Fields not given are kept
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Start time (HH:MM)
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete an event
    Delete { id: String },
    /// Write a commented default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Works even when the existing config file is broken
    if let Commands::InitConfig { force } = cli.command {
        return commands::init_config::run(force);
    }

    let config = CalboardConfig::load()?;
    init_logging(&config.log_filter);

    let store = HttpEventStore::new(&config)?;
    let vm = CalendarViewModel::new(store, MonthCursor::today());

    match cli.command {
        Commands::Month { date, next, prev } => {
            let shift = match (next, prev) {
                (Some(n), _) => n,
                (_, Some(n)) => -n,
                _ => 0,
            };
            commands::month::run(&vm, date.as_deref(), shift).await
        }
        Commands::Day { date } => commands::day::run(&vm, &date).await,
        Commands::Show { id } => commands::show::run(&vm, &id).await,
        Commands::Add {
            date,
            title,
            description,
            location,
            start,
            end,
        } => {
            let changes = commands::FormChanges {
                title: Some(title),
                description: Some(description),
                location,
                start,
                end,
            };
            commands::add::run(&vm, &date, changes).await
        }
        Commands::Edit {
            id,
            title,
            description,
            location,
            start,
            end,
        } => {
            let changes = commands::FormChanges {
                title,
                description,
                location,
                start,
                end,
            };
            commands::edit::run(&vm, &id, changes).await
        }
        Commands::Delete { id } => commands::delete::run(&vm, &id).await,
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}

/// Month offsets for `--next`/`--prev`: non-negative and small enough to negate.
fn months_arg() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(0..)
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
