//! Command-line argument definitions.
//!
//! Argument structs carry clap derives only and convert into the core
//! parameter types, so validation stays in `wayfare-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → ExecutionPlan
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use wayfare_core::{
    driver::webdriver::DEFAULT_WEBDRIVER_URL, models::RunFilter, params::CreateSearch,
};

/// Browser-driven accommodation search
///
/// Wayfare drives a browser through a booking site's search form, stores the
/// listings it finds and reports progress while the run is in flight. It can
/// be used directly from the command line or as an MCP server for AI
/// assistants.
#[derive(Parser)]
#[command(version, about, name = "wayfare")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/wayfare/wayfare.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// WebDriver endpoint (chromedriver, geckodriver)
    #[arg(long, global = true, default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headed: bool,

    /// Run against an in-memory browser that returns no listings
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Pause between steps, in milliseconds
    #[arg(long, global = true)]
    pub settle_ms: Option<u64>,

    /// Maximum number of searches running at the same time
    #[arg(long, global = true)]
    pub max_concurrent_runs: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search for accommodation and wait for the results
    #[command(alias = "s")]
    Search(SearchArgs),
    /// Show the progress of an execution
    #[command(alias = "st")]
    Status(IdArgs),
    /// Show the results stored for an activity
    #[command(alias = "r")]
    Results(IdArgs),
    /// List past and current executions
    Runs(RunsArgs),
    /// List the step kinds the engine can run
    Catalog,
    /// Start the MCP server
    Serve,
}

/// Search for accommodation
#[derive(ClapArgs)]
pub struct SearchArgs {
    /// Destination, e.g. "Lisbon"
    pub location: String,
    #[arg(long, help = "Check-in date (YYYY-MM-DD)")]
    pub from: String,
    #[arg(long, help = "Check-out date (YYYY-MM-DD)")]
    pub to: String,
    #[arg(short, long, help = "Number of adults [default: 1]")]
    pub adults: Option<u32>,
    #[arg(short, long, help = "Number of children [default: 0]")]
    pub children: Option<u32>,
    #[arg(short, long, help = "Free-text description kept with the activity")]
    pub query: Option<String>,
}

impl From<SearchArgs> for CreateSearch {
    fn from(val: SearchArgs) -> Self {
        CreateSearch {
            query: val.query,
            location: val.location,
            start_date: val.from,
            end_date: val.to,
            adults: val.adults,
            children: val.children,
        }
    }
}

/// Identifier argument shared by `status` and `results`
#[derive(ClapArgs)]
pub struct IdArgs {
    #[arg(help = "Execution ID for `status`, activity ID for `results`")]
    pub id: u64,
}

/// List executions
#[derive(ClapArgs)]
pub struct RunsArgs {
    #[arg(
        short,
        long,
        default_value = "all",
        help = "Which runs to show: all, successful, failed or running"
    )]
    pub status: RunFilter,
}
