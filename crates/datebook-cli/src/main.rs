#![forbid(unsafe_code)]

mod cmd;
mod output;
mod user;

use clap::{Parser, Subcommand};
use datebook_core::config::Config;
use datebook_core::store::Store;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "datebook: special dates, wishlists, and a calendar index",
    long_about = None
)]
struct Cli {
    /// Override the database path (defaults to the platform data dir).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Act as this user (overrides DATEBOOK_USER).
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags. `--json` wins over `--quiet`:
    /// machine consumers still get their payload.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Human
        }
    }

    /// Get the user flag as an Option<&str> for identity resolution.
    fn user_flag(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Accounts",
        about = "Register a new user",
        after_help = "EXAMPLES:\n    # Register an account\n    dbk register --username alice --email alice@example.com\n\n    # Emit machine-readable output\n    dbk register --username alice --email alice@example.com --json"
    )]
    Register(cmd::register::RegisterArgs),

    #[command(
        next_help_heading = "Special Dates",
        about = "Record a special date",
        after_help = "EXAMPLES:\n    # Add a birthday\n    dbk add --title \"Mum's birthday\" --date 1960-05-04 --category Birthday\n\n    # Emit machine-readable output\n    dbk add --title \"Anniversary\" --date 2015-06-20 --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Special Dates",
        about = "Remove a special date",
        after_help = "EXAMPLES:\n    # Remove date 7 and its wishlist items\n    dbk remove 7"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Special Dates",
        about = "List your special dates",
        after_help = "EXAMPLES:\n    # List dates in chronological order\n    dbk list\n\n    # Emit machine-readable output\n    dbk list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Calendar",
        about = "Show dates that have events",
        after_help = "EXAMPLES:\n    # Days on which you have at least one special date\n    dbk calendar\n\n    # Emit machine-readable output\n    dbk calendar --json"
    )]
    Calendar(cmd::calendar::CalendarArgs),

    #[command(
        next_help_heading = "Wishlists",
        about = "Attach a wishlist item to a date",
        after_help = "EXAMPLES:\n    # Attach an item to date 3\n    dbk wish 3 --name \"Money\" --url https://money.com --price 20\n\n    # Emit machine-readable output\n    dbk wish 3 --name \"Money\" --json"
    )]
    Wish(cmd::wish::WishArgs),

    #[command(
        next_help_heading = "Wishlists",
        about = "List wishlist items for a date",
        after_help = "EXAMPLES:\n    # Items attached to date 3\n    dbk wishlist 3\n\n    # Emit machine-readable output\n    dbk wishlist 3 --json"
    )]
    Wishlist(cmd::wish::WishlistArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DATEBOOK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "datebook=debug,info"
        } else {
            "datebook=info,warn"
        })
    });

    let format = env::var("DATEBOOK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

/// Resolve the database path: `--db` flag, then config file, then the
/// platform default.
fn resolve_db_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    let config = match Config::default_config_path() {
        Some(path) => Config::load_or_default(&path)?,
        None => Config::default(),
    };
    Ok(config.db_path())
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();

    let db_path = resolve_db_path(cli.db.clone())?;
    debug!(db = %db_path.display(), "opening store");
    let mut store = Store::open(&db_path)?;

    let result = match cli.command {
        Commands::Register(ref args) => cmd::register::run_register(args, &store, output),
        Commands::Add(ref args) => cmd::add::run_add(args, cli.user_flag(), &mut store, output),
        Commands::Remove(ref args) => {
            cmd::remove::run_remove(args, cli.user_flag(), &mut store, output)
        }
        Commands::List(ref args) => cmd::list::run_list(args, cli.user_flag(), &store, output),
        Commands::Calendar(ref args) => {
            cmd::calendar::run_calendar(args, cli.user_flag(), &store, output)
        }
        Commands::Wish(ref args) => cmd::wish::run_wish(args, cli.user_flag(), &store, output),
        Commands::Wishlist(ref args) => {
            cmd::wish::run_wishlist(args, cli.user_flag(), &store, output)
        }
    };

    match result {
        // Handler failures were already rendered to stderr; exit without
        // letting anyhow print them a second time.
        Err(err) if err.is::<cmd::Reported>() => std::process::exit(1),
        other => other,
    }
}
