//! Loading gate shared between the controller and the input layer.
//!
//! The flag is advisory. The controller raises it for the span of each
//! request; the input layer refuses to dispatch while it is set. Nothing
//! queues or locks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(test)]
#[path = "loading_test.rs"]
mod loading_test;

#[derive(Clone, Debug, Default)]
pub struct LoadingGate {
    flag: Arc<AtomicBool>,
}

impl LoadingGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Raise the flag until the returned guard is dropped.
    #[must_use = "the flag drops back to idle as soon as the guard is dropped"]
    pub fn begin(&self) -> LoadingGuard {
        self.flag.store(true, Ordering::Release);
        LoadingGuard { flag: Arc::clone(&self.flag) }
    }
}

/// Clears the loading flag on drop, on every exit path.
#[derive(Debug)]
pub struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
