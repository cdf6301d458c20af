//! `slot` CLI: conflict checks, free-slot search and day timelines over a
//! JSON list of calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Which events clash with a proposed booking?
//! slot conflicts -e events.json --start 2026-03-01T09:30:00-03:00 --end 2026-03-01T10:30:00-03:00
//!
//! # Same check while editing event "evt-2" in place
//! slot conflicts -e events.json --start ... --end ... --exclude evt-2
//!
//! # Earliest free 30-minute slot from 09:00 (events read from stdin)
//! cat events.json | slot --tz America/Sao_Paulo next-slot --date 2026-03-01 --duration 30 --from 09:00
//!
//! # "Jump to next free slot" for a 09:30-10:30 form entry
//! slot suggest -e events.json --date 2026-03-01 --start 09:30 --end 10:30
//!
//! # Day occupancy, free ranges and the sorted agenda
//! slot timeline -e events.json --date 2026-03-01
//! slot free -e events.json --date 2026-03-01 --min-duration 45
//! slot --json agenda -e events.json --date 2026-03-01
//! ```

use anyhow::{Context, Result};
use chrono::Timelike;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::config::parse_clock;
use slot_engine::{
    agenda, build_timeline, find_conflicts, find_next_free_slot_within, free_ranges,
    parse_events_json, suggest_next_slot, BusyMinutes, DayWindow, EngineConfig, Event,
    EventDraft, EventId, Interval, MinuteRange, SlotSuggestion,
};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slot",
    version,
    about = "Calendar conflict checks, free-slot search and day timelines"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (timezone, palette, form defaults)
    #[arg(long, global = true)]
    config: Option<String>,

    /// IANA timezone used to place events on days; overrides the config file
    #[arg(long, global = true, env = "SLOT_TIMEZONE")]
    tz: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List events overlapping a candidate interval
    Conflicts {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Candidate start (ISO 8601)
        #[arg(long)]
        start: String,
        /// Candidate end (ISO 8601)
        #[arg(long)]
        end: String,
        /// Event id to leave out (the event being edited)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Find the earliest free slot of a given length on a day
    NextSlot {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Day to search (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Slot length in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
        /// Earliest start time (HH:MM)
        #[arg(long, default_value = "00:00")]
        from: String,
    },
    /// Suggest where to move a form entry that clashes with existing events
    Suggest {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Day of the entry (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Entry start time (HH:MM)
        #[arg(long)]
        start: String,
        /// Entry end time (HH:MM)
        #[arg(long)]
        end: String,
        /// Event id to leave out (the event being edited)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Show the day's occupancy as colored segments
    Timeline {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Day to draw (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// List the day's free ranges
    Free {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Day to inspect (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Only show ranges at least this many minutes long
        #[arg(long)]
        min_duration: Option<u32>,
    },
    /// List the day's events in start order
    Agenda {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        events: Option<String>,
        /// Day to list (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
}

/// Settings shared by every subcommand.
struct Ctx {
    config: EngineConfig,
    tz: Tz,
    json: bool,
}

impl Ctx {
    fn day(&self, date: &str) -> Result<DayWindow> {
        let window = DayWindow::parse(date, &self.config.timezone)
            .with_context(|| format!("Invalid date: {}", date))?;
        Ok(window)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };
    if let Some(tz) = cli.tz {
        config.timezone = tz;
    }
    config.validate().context("Invalid configuration")?;
    let tz = config.tz()?;
    debug!(timezone = %tz, "configuration ready");

    let ctx = Ctx {
        config,
        tz,
        json: cli.json,
    };

    match cli.command {
        Commands::Conflicts {
            events,
            start,
            end,
            exclude,
        } => {
            let events = load_events(events.as_deref())?;
            let candidate = Interval::parse(&start, &end).context("Invalid candidate interval")?;
            let exclude = exclude.map(EventId::from);
            let conflicts = find_conflicts(&events, &candidate, exclude.as_ref());
            print_events(&ctx, &conflicts, "No conflicts")?;
        }
        Commands::NextSlot {
            events,
            date,
            duration,
            from,
        } => {
            let events = load_events(events.as_deref())?;
            let day = ctx.day(&date)?;
            let from = minute_of_clock(&from)?;
            let busy = BusyMinutes::from_events(&events, &day);
            let slot =
                find_next_free_slot_within(duration, &busy, from, ctx.config.day_length_minutes)
                    .context("Cannot search for a free slot")?;
            if ctx.json {
                print_json(&slot)?;
            } else {
                match slot {
                    Some(slot) => println!("{}", fmt_range(&slot)),
                    None => println!("No free slot left on {}", date),
                }
            }
        }
        Commands::Suggest {
            events,
            date,
            start,
            end,
            exclude,
        } => {
            let events = load_events(events.as_deref())?;
            let day = ctx.day(&date)?;
            let draft = EventDraft {
                title: String::new(),
                description: None,
                date: day.date(),
                start_time: parse_clock(&start)?,
                end_time: parse_clock(&end)?,
            };
            draft
                .validate(&ctx.config.form)
                .context("End time must be after start time")?;
            let candidate = draft.interval(ctx.tz)?;
            let exclude = exclude.map(EventId::from);
            let suggestion = suggest_next_slot(&events, &candidate, exclude.as_ref(), &day)?;
            if ctx.json {
                print_json(&suggestion)?;
            } else {
                match suggestion {
                    SlotSuggestion::Clear => println!("No conflicts; keep {}-{}", start, end),
                    SlotSuggestion::Moved(slot) => println!("Next free slot: {}", fmt_range(&slot)),
                    SlotSuggestion::DayFull => println!("No free slot left on {}", date),
                }
            }
        }
        Commands::Timeline { events, date } => {
            let events = load_events(events.as_deref())?;
            let day = ctx.day(&date)?;
            let segments = build_timeline(&events, &day, &ctx.config.palette);
            if ctx.json {
                print_json(&segments)?;
            } else {
                for segment in &segments {
                    let range = MinuteRange::new(segment.start_minute, segment.end_minute + 1);
                    match segment.event {
                        Some(event) => println!(
                            "{}  {}  {} ({})",
                            fmt_range(&range),
                            segment.color,
                            event.title(),
                            event.id()
                        ),
                        None => println!("{}  {}  free", fmt_range(&range), segment.color),
                    }
                }
            }
        }
        Commands::Free {
            events,
            date,
            min_duration,
        } => {
            let events = load_events(events.as_deref())?;
            let day = ctx.day(&date)?;
            let busy = BusyMinutes::from_events(&events, &day);
            let ranges: Vec<MinuteRange> = free_ranges(&busy, ctx.config.day_length_minutes)?
                .into_iter()
                .filter(|r| r.len() >= min_duration.unwrap_or(1))
                .collect();
            if ctx.json {
                print_json(&ranges)?;
            } else if ranges.is_empty() {
                println!("No free time on {}", date);
            } else {
                for range in &ranges {
                    println!("{} ({} min)", fmt_range(range), range.len());
                }
            }
        }
        Commands::Agenda { events, date } => {
            let events = load_events(events.as_deref())?;
            let day = ctx.day(&date)?;
            let listed = agenda(&events, &day);
            print_events(&ctx, &listed, &format!("No events on {}", date))?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins unless
/// `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_events(path: Option<&str>) -> Result<Vec<Event>> {
    let json = read_input(path)?;
    let events = parse_events_json(&json).context("Failed to parse events JSON")?;
    debug!(count = events.len(), "events loaded");
    Ok(events)
}

fn print_events(ctx: &Ctx, events: &[&Event], empty_message: &str) -> Result<()> {
    if ctx.json {
        return print_json(&events);
    }
    if events.is_empty() {
        println!("{}", empty_message);
    }
    for event in events {
        let start = event.start().with_timezone(&ctx.tz);
        let end = event.end().with_timezone(&ctx.tz);
        println!(
            "{} {}-{}  {} ({})",
            start.format("%Y-%m-%d"),
            start.format("%H:%M"),
            end.format("%H:%M"),
            event.title(),
            event.id()
        );
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", pretty);
    Ok(())
}

fn minute_of_clock(s: &str) -> Result<u32> {
    let time = parse_clock(s).with_context(|| format!("Invalid time (expected HH:MM): {}", s))?;
    Ok(time.hour() * 60 + time.minute())
}

/// `HH:MM-HH:MM` for a half-open minute range; minute 1440 prints as `24:00`.
fn fmt_range(range: &MinuteRange) -> String {
    format!("{}-{}", fmt_minute(range.start), fmt_minute(range.end))
}

fn fmt_minute(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
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
