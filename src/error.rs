//! Error types for the counting pipeline and its collaborators.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the pure geometry layer.
#[derive(Error, Debug)]
pub enum Error {
    /// The detector raised or returned something unusable for this frame.
    #[error("detector failure: {0}")]
    Detector(String),

    /// The frame source could not be opened or read.
    #[error("invalid frame source: {0}")]
    Source(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
