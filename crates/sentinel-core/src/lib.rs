//! sentinel-core: Shared event model, configuration, and error handling for the Sentinel platform.
//!
//! This crate provides the foundational types used by the Sentinel event processors:
//! - Event records with nested, dotted-path addressable fields
//! - Field values (scalars, timestamps, nested structures, shared references)
//! - Processor configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod event;

pub use crate::config::FingerprintConfig;
pub use crate::error::{ConfigError, EventError};
pub use crate::event::{Event, Fields, Value, TIMESTAMP_FIELD};
