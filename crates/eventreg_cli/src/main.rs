//! Command-line front end for the registration core.
//!
//! # Responsibility
//! - Restore the registry from a SQLite file, run one operation, print it.
//! - Keep all rules in `eventreg_core`; this binary only parses and prints.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use eventreg_core::db::open_db;
use eventreg_core::{
    default_log_level, init_logging, Event, Participant, RegistrationService, ServiceError,
    SqliteRegistrationStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "eventreg", version, about = "Register participants for events")]
struct Cli {
    /// SQLite database file holding the registry.
    #[arg(long, env = "EVENTREG_DB", default_value = "eventreg.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "EVENTREG_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "EVENTREG_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage participants.
    #[command(subcommand)]
    Participant(ParticipantCommand),
    /// Manage events.
    #[command(subcommand)]
    Event(EventCommand),
    /// Register a participant for an event.
    Register { participant: String, event: String },
    /// List the events a participant is registered for.
    EventsFor { participant: String },
    /// Remove every participant, event and registration.
    Reset,
}

#[derive(Debug, Subcommand)]
enum ParticipantCommand {
    Add { name: String },
    List,
}

#[derive(Debug, Subcommand)]
enum EventCommand {
    Add(AddEventArgs),
    List,
}

#[derive(Debug, Args)]
struct AddEventArgs {
    name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,
    /// HH:MM[:SS]
    #[arg(long, value_parser = parse_time)]
    start: Option<NaiveTime>,
    /// HH:MM[:SS]
    #[arg(long, value_parser = parse_time)]
    end: Option<NaiveTime>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(log_level(&cli), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ServiceError>().and_then(ServiceError::message) {
                Some(message) => eprintln!("{message}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn log_level(cli: &Cli) -> &str {
    cli.log_level.as_deref().unwrap_or(default_log_level())
}

fn run(cli: &Cli) -> Result<()> {
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let mut service = RegistrationService::open(SqliteRegistrationStore::new(&conn))?;

    match &cli.command {
        Command::Participant(ParticipantCommand::Add { name }) => {
            let participant = service.create_participant(name)?;
            println!("created participant {}", participant.name);
        }
        Command::Participant(ParticipantCommand::List) => {
            for participant in service.find_all_participants() {
                println!("{}", participant.name);
            }
        }
        Command::Event(EventCommand::Add(args)) => {
            let event =
                service.create_event(args.name.as_deref(), args.date, args.start, args.end)?;
            println!("created event {}", describe(&event));
        }
        Command::Event(EventCommand::List) => {
            for event in service.find_all_events() {
                println!("{}", describe(event));
            }
        }
        Command::Register { participant, event } => {
            // Resolved by name inside the service so unknown names get its message.
            let participant = Participant::new(participant.as_str());
            let event = service
                .manager()
                .find_event(event)
                .cloned()
                .unwrap_or_else(|| placeholder_event(event));
            let registration = service.register(Some(&participant), Some(&event))?;
            println!(
                "registered {} for {}",
                registration.participant.name, registration.event.name
            );
        }
        Command::EventsFor { participant } => {
            let participant = service.find_participant(participant)?.clone();
            for event in service.get_events_for_participant(&participant) {
                println!("{}", describe(event));
            }
        }
        Command::Reset => {
            service.reset()?;
            println!("registry cleared");
        }
    }
    Ok(())
}

fn describe(event: &Event) -> String {
    format!(
        "{} {} {}-{}",
        event.name,
        event.date,
        event.start_time.format("%H:%M"),
        event.end_time.format("%H:%M")
    )
}

fn placeholder_event(name: &str) -> Event {
    Event::new(name, NaiveDate::default(), NaiveTime::default(), NaiveTime::default())
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|err| format!("invalid time `{value}`: {err}"))
}
