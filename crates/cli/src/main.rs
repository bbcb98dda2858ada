//! Cozy Hook CLI - catalog browsing, cart, and shop management.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! ch-cli catalog list
//! ch-cli catalog list --category Amigurumi
//! ch-cli catalog list --featured
//!
//! # Work the cart (persisted locally between invocations)
//! ch-cli cart add prod-81
//! ch-cli cart set prod-81 3
//! ch-cli cart show
//!
//! # Manage categories (requires COZYHOOK_ADMIN_TOKEN)
//! ch-cli category add "Seasonal"
//! ch-cli category reorder cat-3 cat-1 cat-2
//!
//! # Upload a product image (requires COZYHOOK_ADMIN_TOKEN)
//! ch-cli media upload ./photos/beanie.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `COZYHOOK_GATEWAY_URL` - Base URL of the catalog gateway (required)
//! - `COZYHOOK_ADMIN_TOKEN` - Shared admin token for write commands
//! - `COZYHOOK_CART_PATH` - Where the cart record lives

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)] // printing is this binary's job

use clap::{Parser, Subcommand};
use cozy_hook_store::ShopStore;
use cozy_hook_store::config::StoreConfig;

mod commands;

#[derive(Parser)]
#[command(name = "ch-cli")]
#[command(author, version, about = "Cozy Hook CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and mutate the local cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage categories (admin)
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage images (admin)
    Media {
        #[command(subcommand)]
        action: MediaAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products in display order
    List {
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,

        /// Only hero-banner products
        #[arg(long)]
        banner: bool,
    },
    /// Show one product in full
    Show {
        /// Product identifier
        id: String,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Print the cart with derived totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product identifier
        id: String,
    },
    /// Remove a line entirely
    Remove {
        /// Product identifier
        id: String,
    },
    /// Set a line's quantity (clamped to a minimum of 1)
    Set {
        /// Product identifier
        id: String,
        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories in display order
    List,
    /// Create a category at the end of the display order
    Add {
        /// Display name
        name: String,
    },
    /// Delete a category
    Delete {
        /// Category identifier
        id: String,
    },
    /// Replace the display order with the given identifier sequence
    Reorder {
        /// Category identifiers, first displays first
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum MediaAction {
    /// Upload an image and print its public URL
    Upload {
        /// Path of the image file
        file: std::path::PathBuf,

        /// Target file name (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,

        /// MIME type (guessed from the extension if omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cozy_hook=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    let store = ShopStore::new(&config);

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                featured,
                banner,
            } => commands::catalog::list(&store, category.as_deref(), featured, banner).await?,
            CatalogAction::Show { id } => commands::catalog::show(&store, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartCommand::Show => commands::cart::show(&store),
            CartCommand::Add { id } => commands::cart::add(&store, &id).await?,
            CartCommand::Remove { id } => commands::cart::remove(&store, &id)?,
            CartCommand::Set { id, quantity } => commands::cart::set(&store, &id, quantity)?,
            CartCommand::Clear => commands::cart::clear(&store)?,
        },
        Commands::Category { action } => match action {
            CategoryAction::List => commands::category::list(&store).await,
            CategoryAction::Add { name } => commands::category::add(&store, &name).await?,
            CategoryAction::Delete { id } => commands::category::delete(&store, &id).await?,
            CategoryAction::Reorder { ids } => commands::category::reorder(&store, &ids).await?,
        },
        Commands::Media { action } => match action {
            MediaAction::Upload {
                file,
                name,
                content_type,
            } => commands::media::upload(&store, &file, name, content_type).await?,
        },
    }
    Ok(())
}
