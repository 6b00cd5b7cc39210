//! sentinel-fingerprint: Content fingerprinting for Sentinel event streams.
//!
//! Selects a configured list of event fields, renders each one canonically,
//! hashes the concatenation, and stores the encoded digest back on the
//! event. Identical field content always yields the same fingerprint, which
//! downstream stores use as a deduplication key.
//!
//! ```
//! use sentinel_core::{Event, Fields, FingerprintConfig, Value};
//! use sentinel_fingerprint::Fingerprint;
//!
//! let config = FingerprintConfig {
//!     hash: "md5".to_string(),
//!     ..Default::default()
//! };
//! let mut processor = Fingerprint::new(&config).unwrap();
//!
//! let mut fields = Fields::new();
//! fields.insert("message".to_string(), Value::from(""));
//! let event = processor.run(Event::new(fields)).unwrap();
//!
//! let fingerprint = event.get_value("fingerprint").unwrap();
//! assert_eq!(fingerprint.as_str(), Some("d41d8cd98f00b204e9800998ecf8427e"));
//! ```

pub mod algorithm;
pub mod encoding;
pub mod error;
pub mod normalize;
pub mod processor;
pub mod shared;
pub mod stream;

pub use algorithm::{Accumulator, HashAlgorithm};
pub use encoding::Encoding;
pub use error::{ProcessError, StreamError};
pub use processor::Fingerprint;
pub use shared::SharedFingerprint;
