//! QuickShop CLI - Browse the catalog, place an order, view the confirmation.
//!
//! # Usage
//!
//! ```bash
//! # Home page best sellers
//! quickshop home
//!
//! # Browse and filter the catalog
//! quickshop products --search jacket --category "men's clothing"
//!
//! # Product details
//! quickshop product 7
//!
//! # Place an order (products 7, 7 and 9)
//! quickshop order --add 7 --add 7 --add 9 \
//!     --name "Jane Doe" --email jane@example.com \
//!     --phone 01012345678 --address "1 Main St"
//!
//! # Show the last order again
//! quickshop confirmation
//! ```
//!
//! Configuration is read from the environment (and `.env`); see
//! `quickshop_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quickshop_core::ProductId;
use quickshop_storefront::config::StorefrontConfig;
use quickshop_storefront::state::StorefrontSession;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "quickshop")]
#[command(author, version, about = "QuickShop storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the home page best sellers
    Home,
    /// List products, optionally filtered
    Products {
        /// Fetch at most this many products
        #[arg(short, long)]
        limit: Option<u32>,

        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Lowest price to show
        #[arg(long)]
        min_price: Option<String>,

        /// Highest price to show
        #[arg(long)]
        max_price: Option<String>,
    },
    /// Show one product's details
    Product {
        /// Product identifier
        id: ProductId,
    },
    /// Add products to the cart and place the order
    Order {
        /// Product to add; repeat to add more units or products
        #[arg(short, long = "add", value_name = "ID", required = true)]
        add: Vec<ProductId>,

        /// Shopper name
        #[arg(long, default_value = "")]
        name: String,

        /// Shopper email
        #[arg(long, default_value = "")]
        email: String,

        /// 11-digit phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Shipping address
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Show the last placed order
    Confirmation,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
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

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::fatal(&format!("Failed to load configuration: {e}"));
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quickshop_storefront=info,quickshop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut session = match StorefrontSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            output::notice(&e.report());
            return ExitCode::FAILURE;
        }
    };

    let succeeded = match cli.command {
        Commands::Home => commands::catalog::home(&session).await,
        Commands::Products {
            limit,
            search,
            category,
            min_price,
            max_price,
        } => {
            let filter = match commands::catalog::build_filter(
                search,
                category,
                min_price.as_deref(),
                max_price.as_deref(),
            ) {
                Ok(filter) => filter,
                Err(e) => {
                    output::fatal(&e.to_string());
                    return ExitCode::FAILURE;
                }
            };
            commands::catalog::products(&session, limit, &filter).await
        }
        Commands::Product { id } => commands::catalog::product(&session, &id).await,
        Commands::Order {
            add,
            name,
            email,
            phone,
            address,
        } => {
            let form = commands::order::ContactArgs {
                name,
                email,
                phone,
                address,
            };
            commands::order::place(&mut session, &add, form).await
        }
        Commands::Confirmation => commands::order::confirmation(&session).await,
    };

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
