//! Market Stall CLI - Terminal front end for the shared product catalog.
//!
//! # Usage
//!
//! ```bash
//! # Interactive: log in, search the catalog, add listings
//! stall
//! stall browse
//!
//! # Sign in once; later commands reuse the session
//! stall login -e trader@example.co.uk
//! stall logout
//!
//! # Print the catalog, optionally filtered
//! stall list coffee
//!
//! # Add a listing
//! stall add --name "Organic Coffee" --store-name "Bean There Cafe" \
//!     --description "Fresh roasted beans" --quantity 20 --price 12.99 --tags "food, coffee"
//!
//! # Insert the sample listings
//! stall seed
//! ```
//!
//! Set `STALL_BACKEND=memory` to try everything without a Firebase project.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_stall_app::config::AppConfig;
use market_stall_app::state::AppState;
use market_stall_core::ProductForm;

mod commands;
mod console;

use console::Console;

#[derive(Parser)]
#[command(name = "stall")]
#[command(author, version, about = "Market Stall catalog client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, then search the catalog and add listings interactively (default)
    Browse,
    /// Sign in and remember the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the remembered session
    Logout,
    /// Print the catalog
    List {
        /// Only show listings containing this text
        query: Option<String>,
    },
    /// Add a product listing
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        store_name: String,

        #[arg(long, default_value = "")]
        store_address: String,

        #[arg(long)]
        description: String,

        /// Whole number of units in stock
        #[arg(long)]
        quantity: String,

        /// Price in pounds
        #[arg(long)]
        price: String,

        /// Free-text tags; the category is inferred from them
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Add the sample listings to the catalog
    Seed,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "market_stall_app=info,market_stall_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_config(config)?;
    let mut console = Console::new();

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => commands::browse::run(&state, &mut console).await?,
        Commands::Login { email, password } => {
            commands::login::run(&state, &mut console, email, password).await?;
        }
        Commands::Logout => commands::login::logout(&state, &mut console).await?,
        Commands::List { query } => commands::catalog::list(&state, &mut console, query).await?,
        Commands::Add {
            name,
            store_name,
            store_address,
            description,
            quantity,
            price,
            tags,
        } => {
            let form = ProductForm {
                name,
                store_name,
                store_address,
                description,
                quantity,
                tags,
                price,
            };
            commands::catalog::add(&state, &mut console, form).await?;
        }
        Commands::Seed => commands::catalog::seed(&state, &mut console).await?,
    }
    Ok(())
}
