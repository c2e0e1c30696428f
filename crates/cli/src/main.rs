//! Bakehouse CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bh-cli migrate
//!
//! # Create an admin account (admins cannot sign up through the API)
//! bh-cli admin create -e admin@example.com -p 'long password' -n "Admin Name"
//!
//! # Give an existing seller a demo catalogue
//! bh-cli seed --seller-email seller@example.com
//! bh-cli seed --seller-email seller@example.com --file catalogue.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bh-cli")]
#[command(author, version, about = "Bakehouse CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Insert a demo catalogue for an existing seller
    Seed {
        /// Email of the seller who will own the products
        #[arg(long)]
        seller_email: String,

        /// YAML catalogue to load instead of the built-in one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Admin display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                name,
            } => {
                commands::admin::create_user(&email, &password, name.as_deref()).await?;
            }
        },
        Commands::Seed { seller_email, file } => {
            commands::seed::catalogue(&seller_email, file.as_deref()).await?;
        }
    }
    Ok(())
}
