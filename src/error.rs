use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarungError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No {kind} with ID {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Item code already exists: {0}")]
    DuplicateCode(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[cfg_attr(not(feature = "pdf"), allow(dead_code))]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WarungError>;
