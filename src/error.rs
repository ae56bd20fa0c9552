//! Error types for Libretto.

use thiserror::Error;

/// Library-level error type for Libretto operations.
#[derive(Error, Debug)]
pub enum LibrettoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed binary data: {0}")]
    Format(String),

    #[error("Analysis response failed schema validation: {0}")]
    Schema(String),

    #[error("No image data in backend response")]
    NoImage,

    #[error("No audio data in backend response")]
    NoAudio,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Libretto operations.
pub type Result<T> = std::result::Result<T, LibrettoError>;
