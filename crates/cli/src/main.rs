//! Formgate CLI - submissions and tier approvals from the command line
//!
//! Usage:
//! ```bash
//! formgate init
//! formgate account register --name "Hari Bahadur" --phone 9841000001 --password secret
//! formgate form submit --phone 9841000001 --type birth --data '{"child": "Maya"}'
//! formgate form act 1 approve --token "$FORMGATE_ADMIN_TOKEN"
//! formgate form act 1 cancel --token "$FORMGATE_SUPER_OFFICIAL_TOKEN" --reason incomplete
//! formgate summary --phone 9841000001
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod db;

use commands::{account, form, summary};

/// Formgate - citizen forms through three approval tiers
#[derive(Parser)]
#[command(name = "formgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/formgate.db", global = true)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Form submissions and tier actions
    Form {
        #[command(subcommand)]
        action: FormAction,
    },

    /// Pending / approved / cancelled counts
    Summary {
        /// Only this citizen's forms
        #[arg(long)]
        phone: Option<String>,
        /// Role token for the all-forms dashboard
        #[arg(long, env = "FORMGATE_TOKEN")]
        token: Option<String>,
    },

    /// Initialize database with schema
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Register a citizen
    Register {
        /// Display name
        #[arg(long, short)]
        name: String,
        /// Phone number (unique)
        #[arg(long, short)]
        phone: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Verify phone number + password
    Login {
        #[arg(long, short)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// List all accounts
    List,
    /// Show account details, by phone number or `--id`
    Show {
        /// Phone number
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        phone: Option<String>,
        /// Account ID
        #[arg(long)]
        id: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum FormAction {
    /// Submit a new form
    Submit {
        /// Owner phone number
        #[arg(long, short)]
        phone: String,
        /// Form category (e.g., birth, recommendation_letter)
        #[arg(long = "type", short = 't')]
        form_type: Option<String>,
        /// Form fields as a JSON object
        #[arg(long, default_value = "{}")]
        data: String,
        /// Citizen-entered date and time, stored as given
        #[arg(long)]
        entered: Option<String>,
    },
    /// Show one form
    Show {
        /// Form ID
        form_id: i64,
    },
    /// List a citizen's forms in submission order
    List {
        /// Owner phone number
        phone: String,
    },
    /// Approve or cancel as the tier behind the role token
    Act {
        /// Form ID
        form_id: i64,
        /// approve | finalized | cancel | cancelled
        decision: String,
        /// Role token
        #[arg(long, env = "FORMGATE_TOKEN")]
        token: Option<String>,
        /// Cancellation reason
        #[arg(long)]
        reason: Option<String>,
        /// Free-text audit note
        #[arg(long)]
        last_action: Option<String>,
        /// Free-text next step
        #[arg(long)]
        next_step: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Ensure data directory exists
    if let Some(parent) = cli.db.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&cli.db, force).await?;
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Status => {
            db::show_status(&cli.db).await?;
        }

        Commands::Account { action } => {
            account::handle(&cli.db, action).await?;
        }

        Commands::Form { action } => {
            form::handle(&cli.db, action).await?;
        }

        Commands::Summary { phone, token } => {
            summary::run(&cli.db, phone, token).await?;
        }
    }

    Ok(())
}
