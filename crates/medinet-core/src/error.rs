use thiserror::Error;

/// Top-level error type for the Medinet assistant.
///
/// Subsystem crates define their own error types and implement
/// `From<MedinetError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MedinetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid search type: {0}")]
    InvalidSearchType(String),
}

impl From<toml::de::Error> for MedinetError {
    fn from(err: toml::de::Error) -> Self {
        MedinetError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MedinetError {
    fn from(err: toml::ser::Error) -> Self {
        MedinetError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MedinetError {
    fn from(err: serde_json::Error) -> Self {
        MedinetError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Medinet operations.
pub type Result<T> = std::result::Result<T, MedinetError>;
