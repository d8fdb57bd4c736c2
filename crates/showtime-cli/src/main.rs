//! `showtime` CLI: lunar dates, day classification, pricing, and schedule
//! generation against a JSON "world" file.
//!
//! ## Usage
//!
//! ```sh
//! # Lunar date for a solar date
//! showtime lunar --date 2025-01-29
//!
//! # Classify a day, with holidays from a world file
//! showtime classify --date 2025-04-30 --world world.json
//!
//! # Ticket price for an IMAX screening at 20:00 local time
//! showtime price --start 2025-06-10T20:00 --format imax
//!
//! # Propose showtimes and persist them into the world file
//! showtime generate --world world.json --request request.json --commit
//!
//! # Check a single placement (exit status 2 when rejected)
//! showtime check --world world.json --candidate candidate.json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=showtime_engine=debug`)
//! to see individual conflict decisions.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use showtime_engine::conflict::ShowtimeCandidate;
use showtime_engine::dst::resolve_local;
use showtime_engine::ports::SystemClock;
use showtime_engine::{
    to_lunar, DayClassifier, EngineConfig, Format, InMemoryStore, ScheduleRequest, Scheduler,
};
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "showtime",
    version,
    about = "Cinema showtime scheduling and conflict checking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration JSON (defaults apply for missing fields)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a solar date to the Vietnamese lunar calendar
    Lunar {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Classify a date (weekend, holidays, early access)
    Classify {
        #[arg(long)]
        date: NaiveDate,
        /// Movie release date, for the early-access tag
        #[arg(long)]
        release: Option<NaiveDate>,
        /// World file to read holidays from
        #[arg(long)]
        world: Option<String>,
    },
    /// Price a screening
    Price {
        /// Local start time, `YYYY-MM-DDTHH:MM`
        #[arg(long, value_parser = parse_local)]
        start: NaiveDateTime,
        #[arg(long, default_value = "2D")]
        format: Format,
        /// The movie is Vietnamese
        #[arg(long)]
        vietnamese: bool,
    },
    /// Propose showtimes for a scheduling request
    Generate {
        #[arg(long)]
        world: String,
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        request: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write accepted proposals back into the world file
        #[arg(long)]
        commit: bool,
    },
    /// Check one candidate showtime against a world
    Check {
        #[arg(long)]
        world: String,
        /// Candidate file (reads from stdin if omitted)
        #[arg(short, long)]
        candidate: Option<String>,
        /// Nearby-room gap in minutes (configured default if omitted)
        #[arg(long)]
        nearby_gap: Option<i64>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Lunar { date } => {
            let lunar = to_lunar(date).with_context(|| format!("Cannot convert {date}"))?;
            println!("{lunar}");
        }
        Commands::Classify {
            date,
            release,
            world,
        } => {
            let store = match world {
                Some(path) => load_world(&path)?,
                None => InMemoryStore::new(),
            };
            let day = DayClassifier::new(&store)
                .with_early_access_days(config.early_access_days)
                .classify_for_release(date, release);
            println!("{}", serde_json::to_string_pretty(&day)?);
        }
        Commands::Price {
            start,
            format,
            vietnamese,
        } => {
            let tz = config.tz()?;
            let utc = resolve_local(tz, start, config.dst_policy)
                .with_context(|| format!("{start} does not exist in {tz}"))?;
            let local = utc.with_timezone(&tz);
            let amount = config
                .pricing
                .price(local, &format, local.date_naive(), vietnamese);
            println!("{amount}");
        }
        Commands::Generate {
            world,
            request,
            output,
            commit,
        } => {
            let mut store = load_world(&world)?;
            let raw = read_input(request.as_deref())?;
            let request: ScheduleRequest =
                serde_json::from_str(&raw).context("Failed to parse schedule request")?;

            let clock = SystemClock;
            let outcome = Scheduler::new(config, &store, &clock)?
                .generate(&request)
                .context("Schedule generation failed")?;
            write_output(output.as_deref(), &serde_json::to_string_pretty(&outcome)?)?;

            if commit && !outcome.proposed.is_empty() {
                store.commit(&outcome.proposed)?;
                write_output(Some(&world), &serde_json::to_string_pretty(&store)?)?;
            }
        }
        Commands::Check {
            world,
            candidate,
            nearby_gap,
        } => {
            let store = load_world(&world)?;
            let raw = read_input(candidate.as_deref())?;
            let candidate: ShowtimeCandidate =
                serde_json::from_str(&raw).context("Failed to parse candidate")?;

            let clock = SystemClock;
            let verdict = Scheduler::new(config, &store, &clock)?
                .check(&candidate, nearby_gap)
                .context("Conflict check failed")?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if !verdict.is_accepted() {
                process::exit(2);
            }
        }
    }

    Ok(())
}

fn parse_local(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = read_input(Some(path))?;
            EngineConfig::from_json_str(&raw)
                .with_context(|| format!("Invalid configuration in {path}"))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_world(path: &str) -> Result<InMemoryStore> {
    let raw = read_input(Some(path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse world file: {path}"))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
