use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeederError>;

#[derive(Error, Debug)]
pub enum SeederError {
    #[error("Failed to read calendar file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse calendar JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("No bundled calendar for {0}")]
    UnknownSeason(i32),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
