//! Error types for calboard.

use thiserror::Error;

/// Errors that can occur in calboard operations.
#[derive(Error, Debug)]
pub enum CalboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("An event with id '{0}' already exists")]
    DuplicateEvent(String),

    #[error("Event ends before it starts")]
    InvalidTimeRange,

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Color '{0}' is not in the palette")]
    InvalidColor(String),

    #[error("Event form is not open")]
    FormClosed,

    #[error("Drag payload error: {0}")]
    Payload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for calboard operations.
pub type CalboardResult<T> = Result<T, CalboardError>;
