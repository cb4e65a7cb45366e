use thiserror::Error;

/// Errors shared across the introspection and correction stages.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure to open or release a database connection.
    #[error("connection error: {0}")]
    Connection(String),
    /// Failure while reading schema metadata from a live database.
    #[error("extraction error: {0}")]
    Extraction(String),
    /// The extracted model is internally inconsistent.
    #[error("invalid model: {0}")]
    InvalidModel(String),
    /// A capability the requested backend does not provide.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Convenience alias used across schemagen crates.
pub type Result<T> = std::result::Result<T, Error>;
