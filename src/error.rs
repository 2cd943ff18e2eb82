use thiserror::Error;

#[derive(Error, Debug)]
pub enum DineroError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown resolution strategy: {0} (expected keep-old or replace)")]
    UnknownStrategy(String),

    #[error("Resolution session is already closed")]
    SessionClosed,

    #[error("No conflict at index {0}")]
    UnknownConflict(usize),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DineroError>;
