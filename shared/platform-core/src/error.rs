//! Error types for platform bootstrap

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlatformError>;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Build error: {0}")]
    Build(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Tls(_) => "TLS_ERROR",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::Auth(_) => "AUTH_ERROR",
            Self::MissingCapability(_) => "MISSING_CAPABILITY",
            Self::Build(_) => "BUILD_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        PlatformError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for PlatformError {
    fn from(err: url::ParseError) -> Self {
        PlatformError::InvalidUrl(err.to_string())
    }
}
