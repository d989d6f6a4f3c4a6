//! Error types for RK disk tools.

use thiserror::Error;

/// Errors that can occur while encoding, transcoding or accessing a volume.
#[derive(Error, Debug)]
pub enum RkError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("The file size is zero: {0}")]
    EmptyFile(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("Unknown code page: {0}")]
    InvalidCodePage(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for RK operations.
pub type RkResult<T> = Result<T, RkError>;
