//! # Catalog Browser Library
//!
//! Controllers for the product list and product detail screens, plus the
//! command-line front end that renders them.
//!
//! ## Module Organization
//! ```text
//! catalog_browser_lib/
//! ├── lib.rs          ◄─── You are here (CLI parsing, tracing, run)
//! ├── state/
//! │   ├── mod.rs      ◄─── Controller exports, in-flight guard
//! │   ├── browser.rs  ◄─── BrowserController (list, filter, sort)
//! │   └── viewer.rs   ◄─── ViewerController (single product)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Output format, JSON writer
//! │   ├── products.rs ◄─── browse, categories
//! │   └── product.rs  ◄─── show
//! └── error.rs        ◄─── AppError and exit codes
//! ```
//!
//! ## Usage
//! ```text
//! catalog-browser browse --category "Home decoration" --sort price-asc
//! catalog-browser show 5 --retry
//! catalog-browser --json categories
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use catalog_api::{CatalogConfig, HttpCatalogClient};
use catalog_core::types::parse_product_id;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::products::BrowseOptions;
use commands::OutputFormat;
use error::{AppError, AppResult};
use state::{BrowserController, ViewerController};

// =============================================================================
// Command Line
// =============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse a remote product catalog", long_about = None)]
pub struct Cli {
    /// Path to catalog.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the catalog base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Print the state snapshot as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List products, optionally filtered by category and sorted
    Browse {
        /// Category label (e.g. "Home decoration") or slug
        #[arg(long)]
        category: Option<String>,

        /// One of name-asc, name-desc, price-asc, price-desc, rating-asc, rating-desc
        #[arg(long)]
        sort: Option<String>,

        /// Retry once if a request fails
        #[arg(long)]
        retry: bool,
    },

    /// Show one product
    Show {
        /// Product id
        id: String,

        /// Retry once if the request fails
        #[arg(long)]
        retry: bool,
    },

    /// List categories with their slugs
    Categories {
        /// Retry once if the request fails
        #[arg(long)]
        retry: bool,
    },
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Loads the configuration and layers the command-line overrides on top.
    fn load_config(&self) -> AppResult<CatalogConfig> {
        let mut config = CatalogConfig::load(self.config.clone()).map_err(AppError::Config)?;

        if let Some(ref base_url) = self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.api.timeout_secs = timeout_secs;
        }
        config.validate().map_err(AppError::Config)?;

        Ok(config)
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Parses arguments, runs one command and returns the process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Parse arguments (clap) ────────────────────────────────────────────►│
/// │  2. Initialize tracing (stderr, RUST_LOG or --verbose) ────────────────►│
/// │  3. Load config: defaults ◄ catalog.toml ◄ CATALOG_* ◄ flags ──────────►│
/// │  4. Build HttpCatalogClient (timeout on connect + request) ────────────►│
/// │  5. Build the controller for the command and drive it ─────────────────►│
/// │  6. Render snapshot to stdout, errors to stderr, map to exit code ─────►│
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match runtime.block_on(execute(&cli, &mut out)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(code = ?err.code(), error = %err, "command failed");
            report(&cli, &err);
            err.exit_code()
        }
    }
}

/// Runs the parsed command against the configured catalog.
pub async fn execute(cli: &Cli, out: &mut impl Write) -> AppResult<()> {
    let config = cli.load_config()?;
    let client = Arc::new(HttpCatalogClient::new(&config.api).map_err(AppError::Config)?);
    info!(base_url = %client.base_url(), command = ?cli.command, "Starting catalog browser");

    let format = cli.output_format();
    match &cli.command {
        Command::Browse {
            category,
            sort,
            retry,
        } => {
            let controller = BrowserController::new(client, config.browse.clone());
            debug!(session = %controller.session_id(), "browser session started");
            let options = BrowseOptions {
                category: category.clone(),
                sort: sort.clone(),
                retry: *retry,
                format,
            };
            commands::products::browse(&controller, &options, out).await
        }
        Command::Show { id, retry } => {
            let product_id = parse_product_id(id)?;
            let viewer = ViewerController::new(client, product_id);
            debug!(session = %viewer.session_id(), product_id, "viewer session started");
            commands::product::show(&viewer, *retry, format, out).await
        }
        Command::Categories { retry } => {
            let controller = BrowserController::new(client, config.browse.clone());
            commands::products::categories(&controller, *retry, format, out).await
        }
    }
}

fn report(cli: &Cli, err: &AppError) {
    let stderr = io::stderr();
    let mut stderr = stderr.lock();
    if cli.json {
        if let Ok(body) = serde_json::to_string(&err.body()) {
            let _ = writeln!(stderr, "{}", body);
        }
    } else {
        let _ = writeln!(stderr, "error: {}", err);
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=catalog_api=debug` - Show every request with its timing
/// - Default: WARN, or `info,catalog=debug` with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,catalog=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
