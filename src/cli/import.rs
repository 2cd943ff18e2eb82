use std::io::IsTerminal;
use std::path::PathBuf;

use colored::Colorize;

use crate::cli::conflict_manager::ConflictScreen;
use crate::db::get_connection;
use crate::error::{DineroError, Result};
use crate::importer::{import_file, ImportOutcome};
use crate::session::BulkDecision;
use crate::settings::db_path;
use crate::tui::run_screen;

pub fn run(file: &str, resolve: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let db = db_path();
    if !db.exists() {
        return Err(DineroError::Settings(format!(
            "No database found at {}\nRun `dinero init` first.",
            db.display()
        )));
    }
    let mut conn = get_connection(&db)?;

    match import_file(&mut conn, &file_path)? {
        ImportOutcome::DuplicateFile => {
            println!("This file has already been imported (duplicate checksum).");
        }
        ImportOutcome::NothingImportable => {
            println!("No importable rows found in {file}.");
        }
        ImportOutcome::NothingNew { duplicates } => {
            println!("Nothing new to import ({duplicates} exact duplicates skipped).");
        }
        ImportOutcome::Imported { appended, duplicates } => {
            println!(
                "{} {appended} imported, {duplicates} skipped (duplicates), 0 conflicts",
                "Done.".green().bold()
            );
        }
        ImportOutcome::NeedsResolution(mut session) => {
            println!(
                "{} {} clean, {} potential duplicates need a decision",
                "Conflicts.".yellow().bold(),
                session.clean_count(),
                session.conflicts().len()
            );

            match resolve {
                Some(strategy) => {
                    let decision: BulkDecision = strategy.parse()?;
                    let summary = session.resolve_all(decision)?;
                    println!(
                        "{} {} appended, {} replaced",
                        "Resolved.".green().bold(),
                        summary.appended,
                        summary.replaced
                    );
                }
                None => {
                    if !std::io::stdout().is_terminal() {
                        session.abandon();
                        return Err(DineroError::Other(
                            "conflicts need a terminal to resolve interactively; \
                             re-run with --resolve keep-old|replace"
                                .to_string(),
                        ));
                    }
                    let mut screen = ConflictScreen::new(session);
                    run_screen(&mut screen)?;
                    if let Some(message) = screen.final_message() {
                        println!("{message}");
                    }
                }
            }
        }
    }

    Ok(())
}
