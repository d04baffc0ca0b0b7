//! Error types for filededup

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filededup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filededup operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Directory inaccessible: {}: {source}", path.display())]
    DirectoryInaccessible {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {} during scan: {source}", path.display())]
    ScanRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove {} during scan: {source}", path.display())]
    ScanDelete {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Name already taken on disk: {0}")]
    NameCollision(String),

    #[error("Unable to open mailbox {}: {source}", path.display())]
    Mailbox {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed mailbox: {}", .0.display())]
    MailboxRead(PathBuf),
}
