//! Error types for the shelf archive.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the shelf archive.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Import directory not configured. Set IMPORT_DIR or pass --import-dir")]
    ImportDirMissing,

    #[error("TMDB API key not configured. Set TMDB_API_KEY environment variable")]
    TmdbApiKeyMissing,

    // Workflow errors
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Import session not found: {0}")]
    SessionNotFound(String),

    #[error("Import session is incomplete: {0} has not been chosen")]
    IncompleteSession(&'static str),

    #[error("No existing title with slug: {0}")]
    ExistingTitleNotFound(String),

    #[error("Existing title {slug} is a {found}, but the import is a {expected}")]
    KindMismatch {
        slug: String,
        expected: String,
        found: String,
    },

    // Import errors
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Existing title directory not found: {}", .0.display())]
    ExistingTitleMissing(PathBuf),

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Metadata provider errors
    #[error("TMDB request failed: {0}")]
    Provider(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config file errors
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Create a validation error for a named field.
    pub fn validation<S: Into<String>>(field: &'static str, message: S) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// The workflow field this error points at, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
