//! Taskdeck CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! td-cli migrate
//!
//! # Seed the database with demo data
//! td-cli seed
//!
//! # Create a platform super-admin
//! td-cli superadmin create -e ops@example.com -n "Platform Ops" -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with a demo tenant, users, projects, and tasks
//! - `superadmin create` - Create platform super-admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "td-cli")]
#[command(author, version, about = "Taskdeck CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed,
    /// Manage platform super-admins
    Superadmin {
        #[command(subcommand)]
        action: SuperadminAction,
    },
}

#[derive(Subcommand)]
enum SuperadminAction {
    /// Create a new super-admin account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
        Commands::Superadmin { action } => match action {
            SuperadminAction::Create {
                email,
                name,
                password,
            } => commands::superadmin::create(&email, &name, &password).await,
        },
    }
}
