use thiserror::Error;

/// Construction-time configuration errors.
///
/// A processor that fails with one of these is never built.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid hash type '{0}'")]
    UnknownHash(String),

    #[error("Invalid encoding type '{0}'")]
    UnknownEncoding(String),

    #[error("Target field must not be empty")]
    EmptyTarget,

    #[error("Target field '{0}' is reserved for the event timestamp")]
    ReservedTarget(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors raised while reading, writing, or converting event fields.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Cannot set '{path}': '{segment}' is not an object")]
    NotAnObject { path: String, segment: String },

    #[error("Field '@timestamp' must hold a timestamp")]
    TimestampType,

    #[error("Invalid @timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Event must be a JSON object")]
    ExpectedObject,
}
