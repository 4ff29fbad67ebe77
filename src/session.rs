//! Preview session tracking.
//!
//! A viewer surface shows one document at a time, but requests to show
//! documents can overlap: the user picks a second file while the first is
//! still downloading. Each request takes a numbered token from the
//! session; starting a newer request invalidates every older token, and
//! stale work checks its token before publishing results.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Issues preview tokens and tracks which request is current.
#[derive(Debug, Clone, Default)]
pub struct PreviewSession {
    generation: Arc<AtomicU64>,
}

impl PreviewSession {
    /// Create a session with no outstanding previews.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new preview, superseding all earlier ones.
    pub fn begin(&self) -> SessionToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SessionToken {
            generation,
            counter: Arc::clone(&self.generation),
        }
    }

    /// Invalidate every outstanding token without starting a new preview.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Token for one preview request.
#[derive(Debug, Clone)]
pub struct SessionToken {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl SessionToken {
    /// Whether this request is still the latest one.
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }

    /// Bail out if a newer request has started.
    pub fn ensure_current(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Error::Cancelled)
        }
    }
}
