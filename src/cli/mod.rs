pub mod bills;
pub mod conflict_manager;
pub mod import;
pub mod init;
pub mod status;
pub mod transactions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dinero", about = "Personal budgeting CLI: statement import, categorization, reconciliation.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up dinero: choose a data directory and initialize the database.
    Init {
        /// Path for dinero data (default: ~/Documents/dinero)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a bank-statement CSV, categorize it, and reconcile duplicates.
    Import {
        /// Path to the CSV file to import
        file: String,
        /// Resolve all conflicts non-interactively: keep-old or replace
        #[arg(long)]
        resolve: Option<String>,
    },
    /// Manage ledger transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommands,
    },
    /// Manage recurring bills (consulted by the categorizer).
    Bills {
        #[command(subcommand)]
        command: BillsCommands,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List transactions, optionally for one month.
    List {
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    /// Add a transaction by hand.
    Add {
        /// Date: YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Description text
        #[arg(long)]
        description: String,
        /// Signed amount (negative = outflow)
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
        /// Category label (default: Other)
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove a transaction by ID.
    Rm {
        /// Transaction ID (shown in `dinero transactions list`)
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BillsCommands {
    /// List configured bills.
    List,
    /// Add a bill.
    Add {
        /// Bill name, e.g. 'Car Loan'
        name: String,
        /// Monthly amount
        #[arg(long)]
        amount: f64,
        /// Due day of month (1-31)
        #[arg(long)]
        day: u32,
    },
    /// Remove a bill by ID.
    Rm {
        /// Bill ID (shown in `dinero bills list`)
        id: i64,
    },
}
