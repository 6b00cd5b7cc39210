//! A processor that can be shared between threads.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use sentinel_core::Event;

use crate::error::Result;
use crate::processor::Fingerprint;

/// Cloneable handle to one [`Fingerprint`] behind a mutex.
///
/// Calls to [`run`](Self::run) are serialized. Each run starts by
/// resetting the accumulator, so a lock poisoned by a panicking caller is
/// recovered rather than propagated.
#[derive(Clone)]
pub struct SharedFingerprint {
    inner: Arc<Mutex<Fingerprint>>,
}

impl SharedFingerprint {
    pub fn new(processor: Fingerprint) -> Self {
        Self {
            inner: Arc::new(Mutex::new(processor)),
        }
    }

    pub fn run(&self, event: Event) -> Result<Event> {
        self.lock().run(event)
    }

    pub fn fingerprint(&self, event: &Event) -> Result<String> {
        self.lock().fingerprint(event)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Fingerprint> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Fingerprint> for SharedFingerprint {
    fn from(processor: Fingerprint) -> Self {
        Self::new(processor)
    }
}

impl fmt::Display for SharedFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.lock(), f)
    }
}
