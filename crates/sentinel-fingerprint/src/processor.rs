//! The fingerprint processor.

use std::fmt;

use sentinel_core::{ConfigError, Event, FingerprintConfig, Value, TIMESTAMP_FIELD};

use crate::algorithm::{Accumulator, HashAlgorithm};
use crate::encoding::Encoding;
use crate::error::Result;
use crate::normalize;

/// Computes a content fingerprint over a fixed list of event fields.
///
/// The configured fields are rendered in order, concatenated without
/// separators, hashed, encoded, and stored under the target field.
///
/// A processor owns one digest accumulator that is reset for every event,
/// so `run` takes `&mut self`. Use one processor per worker, or wrap it in
/// a [`SharedFingerprint`](crate::SharedFingerprint).
pub struct Fingerprint {
    algorithm: HashAlgorithm,
    encoding: Encoding,
    fields: Vec<String>,
    target: String,
    accumulator: Accumulator,
}

impl Fingerprint {
    /// Resolve `config` into a ready processor.
    ///
    /// Unknown hash or encoding names fail here rather than per event. An
    /// empty field list falls back to the default (`message`).
    pub fn new(config: &FingerprintConfig) -> std::result::Result<Self, ConfigError> {
        let algorithm: HashAlgorithm = config.hash.parse()?;
        let encoding: Encoding = config.encoding.parse()?;

        if config.target.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if config.target == TIMESTAMP_FIELD {
            return Err(ConfigError::ReservedTarget(config.target.clone()));
        }

        let fields = if config.fields.is_empty() {
            FingerprintConfig::default().fields
        } else {
            config.fields.clone()
        };

        let processor = Self {
            algorithm,
            encoding,
            fields,
            target: config.target.clone(),
            accumulator: algorithm.accumulator(),
        };

        tracing::debug!(processor = %processor, %encoding, "Fingerprint processor configured");
        Ok(processor)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Compute the encoded fingerprint of `event` without modifying it.
    pub fn fingerprint(&mut self, event: &Event) -> Result<String> {
        self.accumulator.reset();
        for field in &self.fields {
            let value = event.get_value(field);
            normalize::write_value(&mut self.accumulator, value.as_deref())?;
        }

        let digest = self.accumulator.finalize_reset();
        Ok(self.encoding.encode(&digest))
    }

    /// Fingerprint `event` and store the result under the target field,
    /// replacing any existing value.
    ///
    /// The target is only written once the digest is complete.
    pub fn run(&mut self, mut event: Event) -> Result<Event> {
        let fingerprint = self.fingerprint(&event)?;
        tracing::trace!(target_field = %self.target, %fingerprint, "Computed fingerprint");

        event.put_value(&self.target, Value::String(fingerprint))?;
        Ok(event)
    }
}

impl Clone for Fingerprint {
    /// The clone gets its own fresh accumulator.
    fn clone(&self) -> Self {
        Self {
            algorithm: self.algorithm,
            encoding: self.encoding,
            fields: self.fields.clone(),
            target: self.target.clone(),
            accumulator: self.algorithm.accumulator(),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fingerprint=[fields={}, hash={}, target={}]",
            self.fields.join(", "),
            self.algorithm,
            self.target
        )
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("algorithm", &self.algorithm)
            .field("encoding", &self.encoding)
            .field("fields", &self.fields)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
