use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown column in CSV header: {0:?}")]
    UnknownColumn(String),

    #[error("Column {0:?} appears more than once in the CSV header")]
    DuplicateColumn(String),

    #[error("CSV has no ICVA ID column")]
    MissingIdColumn,

    #[error("Line {line}: empty ICVA ID")]
    MissingId { line: u64 },

    #[error("Line {line}: invalid integer {value:?} in column {column}")]
    InvalidInteger {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: invalid test date {value:?} (expected DD-MON-YYYY)")]
    InvalidDate { line: u64, value: String },

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Unsupported database URL scheme: {0:?}")]
    UnsupportedUrl(String),

    #[error("Duplicate primary key, batch rolled back: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
