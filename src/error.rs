//! Error types for mathdown.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mathdown operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around a conversion.
///
/// Rendering itself never fails; these cover the file edges.
#[derive(Error, Debug)]
pub enum Error {
    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stylesheet path exists but could not be read.
    #[error("Failed to read stylesheet {path:?}: {source}")]
    Css {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document could not be used.
    #[error("Invalid input: {0}")]
    Input(String),
}
