//! Shared error type across svcPrism crates.

use thiserror::Error;

/// Stable error codes, used in logs and asserted by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid identity or configuration.
    Configuration,
    /// Discovery subject/message shape not understood.
    Protocol,
    /// Subscribe/publish/reply failed in the transport.
    Transport,
    /// Response could not be encoded.
    Serialization,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Configuration => "CONFIGURATION",
            ErrorCode::Protocol => "PROTOCOL",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Serialization => "SERIALIZATION",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SvcError>;

/// Unified error type used by core and registry.
#[derive(Debug, Error)]
pub enum SvcError {
    #[error("configuration: {0}")]
    Configuration(String),
    #[error("protocol: {0}")]
    Protocol(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl SvcError {
    /// Map error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SvcError::Configuration(_) => ErrorCode::Configuration,
            SvcError::Protocol(_) => ErrorCode::Protocol,
            SvcError::Transport(_) => ErrorCode::Transport,
            SvcError::Serialization(_) => ErrorCode::Serialization,
            SvcError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            SvcError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<serde_json::Error> for SvcError {
    fn from(e: serde_json::Error) -> Self {
        SvcError::Serialization(e.to_string())
    }
}
