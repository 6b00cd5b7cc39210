//! Error types for the sentinel-fingerprint crate.

use std::fmt;

use sentinel_core::EventError;
use thiserror::Error;

/// Runtime failure while fingerprinting an event.
///
/// Missing fields are never an error; these only surface when rendering
/// into the digest or writing the target field fails.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to render field value: {0}")]
    Render(#[from] fmt::Error),

    #[error("Failed to write fingerprint: {0}")]
    Event(#[from] EventError),
}

/// Failure while processing a stream of NDJSON events.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 on line {line}: {source}")]
    InvalidUtf8 {
        line: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Invalid JSON on line {line}: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid event on line {line}: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: EventError,
    },

    #[error("Failed to fingerprint line {line}: {source}")]
    Process {
        line: usize,
        #[source]
        source: ProcessError,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProcessError>;
