use thiserror::Error;

/// Errors raised while rendering and writing generated source.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// An embedded template failed to load.
    #[error("template error: {0}")]
    Template(String),
    /// Rendering failed for one table.
    #[error("render error for {table}: {message}")]
    Render { table: String, message: String },
    /// Creating directories or writing files failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
