//! Pocketbook CLI - income and expense tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{add, categories, edit, list, login, logout, remove, signup, summary, whoami};

/// Pocketbook - income and expense tracking in your terminal
#[derive(Parser)]
#[command(name = "pb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account (prompts for a password)
    Signup {
        /// Email address
        email: String,
    },

    /// Sign in (prompts for a password)
    Login {
        /// Email address
        email: String,
    },

    /// Sign out and clear the cached session
    Logout,

    /// Show the current session state
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List transactions
    List {
        /// Only one kind (income or expense)
        #[arg(long)]
        kind: Option<String>,
        /// Only one category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a new transaction
    Add {
        /// income or expense
        kind: String,
        /// Amount (positive)
        #[arg(long)]
        amount: String,
        /// Title/description
        #[arg(long)]
        title: String,
        /// Category key (see 'pb categories')
        #[arg(long)]
        category: String,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change amount, title or category of a transaction
    Edit {
        /// income or expense
        kind: String,
        /// Record id
        id: String,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New title/description
        #[arg(long)]
        title: Option<String>,
        /// New category key
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a transaction
    Remove {
        /// income or expense
        kind: String,
        /// Record id
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show the dashboard summary
    Summary {
        /// Narrow to a period: day, week, month or year
        #[arg(long)]
        period: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the category table
    Categories {
        /// Only one kind (income or expense)
        #[arg(long)]
        kind: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup { email } => signup::run(&email),
        Commands::Login { email } => login::run(&email),
        Commands::Logout => logout::run(),
        Commands::Whoami { json } => whoami::run(json),
        Commands::List { kind, category, json } => list::run(kind, category, json),
        Commands::Add { kind, amount, title, category, date } => {
            add::run(&kind, &amount, &title, &category, date)
        }
        Commands::Edit { kind, id, amount, title, category } => {
            edit::run(&kind, &id, amount, title, category)
        }
        Commands::Remove { kind, id, force } => remove::run(&kind, &id, force),
        Commands::Summary { period, json } => summary::run(period, json),
        Commands::Categories { kind, json } => categories::run(kind, json),
    }
}
