//! # kost: Command-Line Front End
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Application Startup                             │
//! │                                                                         │
//! │  1. Initialize Logging ─── tracing-subscriber, RUST_LOG or default     │
//! │  2. Load Configuration ─── KOST_* env > config.toml > defaults         │
//! │  3. Connect to Database ── SQLite (WAL), pending migrations applied     │
//! │  4. Run Command ────────── quote, check, order, booking, review,       │
//! │                            property, rooms, summary                     │
//! │  5. Print JSON ─────────── stdout on success, stderr + exit 1 on error  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::booking::BookingCommand;
use commands::order::OrderCommand;
use commands::property::PropertyCommand;
use commands::quote::QuoteArgs;
use commands::review::ReviewCommand;
use commands::room::RoomCommand;
use commands::summary::SummaryArgs;
use commands::{Context, StayArgs};
use config::AppConfig;
use error::{CliError, CliResult};
use kost_db::Database;

#[derive(Parser, Debug)]
#[command(name = "kost", author, version, about = "Kost room booking from the command line")]
struct Cli {
    /// Config file (default: platform config dir / config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file; overrides config and KOST_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a stay
    Quote(QuoteArgs),

    /// Check whether a category has a free room
    Check(StayArgs),

    /// Place and manage orders
    #[command(subcommand)]
    Order(OrderCommand),

    /// Complete or cancel reservations
    #[command(subcommand)]
    Booking(BookingCommand),

    /// Add and list reviews
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Register and list properties
    #[command(subcommand)]
    Property(PropertyCommand),

    /// Register, list and (un)list rooms
    #[command(subcommand)]
    Rooms(RoomCommand),

    /// Owner dashboard figures
    Summary(SummaryArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.db {
        config.db_path = Some(path);
    }

    let db_config = config.db_config()?;
    info!(db_path = ?db_config.database_path, "Database path determined");

    let db = Database::new(db_config).await?;
    let ctx = Context::new(db, config);

    let result = dispatch(&ctx, cli.command).await;
    ctx.db.close().await;
    result
}

async fn dispatch(ctx: &Context, command: Command) -> CliResult<()> {
    match command {
        Command::Quote(args) => print(&commands::quote::run(ctx, args).await?),
        Command::Check(args) => print(&commands::availability::run(ctx, args).await?),
        Command::Order(cmd) => print(&commands::order::run(ctx, cmd).await?),
        Command::Booking(cmd) => print(&commands::booking::run(ctx, cmd).await?),
        Command::Review(cmd) => print(&commands::review::run(ctx, cmd).await?),
        Command::Property(cmd) => print(&commands::property::run(ctx, cmd).await?),
        Command::Rooms(cmd) => print(&commands::room::run(ctx, cmd).await?),
        Command::Summary(args) => print(&commands::summary::run(ctx, args).await?),
    }
}

fn print<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::from)?;
    println!("{}", json);
    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "info,kost=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays valid JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kost=trace` - Show trace for kost crates only
/// - Default: INFO, debug for kost crates
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` directives when they parse, the default otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rust_log_replaces_default_filter() {
        assert_eq!(log_filter(Some("error".to_string())).to_string(), "error");

        let default = log_filter(None).to_string();
        assert!(default.contains("kost=debug"));
        assert!(default.contains("sqlx=warn"));
    }

    #[test]
    fn test_parses_order_place() {
        let cli = Cli::try_parse_from([
            "kost",
            "--db",
            "/tmp/kost.db",
            "order",
            "place",
            "--category",
            "Type 1",
            "--check-in",
            "2024-01-15",
            "--check-out",
            "2024-04-15",
            "--name",
            "Rina",
            "--email",
            "rina@example.com",
            "--phone",
            "081234567890",
            "--payment",
            "qris",
        ])
        .unwrap();

        match cli.command {
            Command::Order(OrderCommand::Place(args)) => {
                assert_eq!(args.stay.category, "Type 1");
                assert_eq!(args.payment, kost_core::PaymentMethod::Qris);
                assert!(!args.pricing.daily);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_daily_flag_only_on_pricing_commands() {
        let stay = ["--category", "Type 1", "--check-in", "2024-01-01", "--check-out", "2024-01-16"];

        let quote = Cli::try_parse_from(
            ["kost", "quote"].into_iter().chain(stay).chain(["--daily"]),
        )
        .unwrap();
        match quote.command {
            Command::Quote(args) => assert!(args.pricing.daily),
            other => panic!("unexpected command: {:?}", other),
        }

        let check = Cli::try_parse_from(
            ["kost", "check"].into_iter().chain(stay).chain(["--daily"]),
        );
        assert!(check.is_err());
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "kost",
            "check",
            "--category",
            "Type 1",
            "--check-in",
            "15/01/2024",
            "--check-out",
            "2024-04-15",
        ]);
        assert!(result.is_err());
    }
}
