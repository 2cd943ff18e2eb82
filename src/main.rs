mod categorizer;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod ledger;
mod models;
mod reconciler;
mod session;
mod settings;
mod tui;

use clap::Parser;

use cli::{BillsCommands, Cli, Commands, TransactionsCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, resolve } => cli::import::run(&file, resolve.as_deref()),
        Commands::Transactions { command } => match command {
            TransactionsCommands::List { month } => cli::transactions::list(month.as_deref()),
            TransactionsCommands::Add {
                date,
                description,
                amount,
                category,
            } => cli::transactions::add(&date, &description, amount, category.as_deref()),
            TransactionsCommands::Rm { id } => cli::transactions::rm(id),
        },
        Commands::Bills { command } => match command {
            BillsCommands::List => cli::bills::list(),
            BillsCommands::Add { name, amount, day } => cli::bills::add(&name, amount, day),
            BillsCommands::Rm { id } => cli::bills::rm(id),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
