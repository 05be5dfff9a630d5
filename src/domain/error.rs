//! Domain error types

use thiserror::Error;

/// Errors that can occur while talking to the USC-3 controller
#[derive(Error, Debug)]
pub enum Usc3Error {
    #[error("USC-3 device not found: {0}")]
    DeviceNotFound(String),

    #[error("Ambiguous device selection: {0}")]
    AmbiguousDevice(String),

    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Unrecognized status token: '{0}'")]
    UnrecognizedStatus(String),

    /// A typed query got a status code back instead of its payload.
    #[error("Controller replied with status {code}: {description}")]
    StatusReply { code: u8, description: &'static str },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for USC-3 operations
pub type Usc3Result<T> = Result<T, Usc3Error>;
