//! Error types for vidloop-pl
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for vidloop-pl
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resume record could not be read or interpreted
    #[error("Resume record error: {0}")]
    Resume(String),

    /// Operation needs at least one movie
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Relative operation issued before anything was served
    #[error("Playlist has not started; no current movie")]
    NotStarted,
}

/// Convenience Result type using vidloop-pl Error
pub type Result<T> = std::result::Result<T, Error>;
