//! Status notifier — single auto-dismissing status message.
//!
//! DESIGN
//! ======
//! Each change cancels the pending dismissal task and, for a non-empty
//! message, spawns a fresh one-shot task that clears the message after the
//! configured TTL. A generation counter is bumped on every change so a task
//! that already woke up can never clear a newer message. Setting the same
//! text again is not a change and keeps the running timer.
//!
//! The task holds only a weak reference to the shared state; dropping the
//! notifier aborts it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

#[cfg(test)]
#[path = "notifier_test.rs"]
mod notifier_test;

pub struct StatusNotifier {
    inner: Arc<Mutex<NotifierInner>>,
    ttl: Duration,
}

#[derive(Default)]
struct NotifierInner {
    message: Option<String>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl StatusNotifier {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { inner: Arc::new(Mutex::new(NotifierInner::default())), ttl }
    }

    /// Currently visible message, if any.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        lock(&self.inner).message.clone()
    }

    /// Whether a dismissal task is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        lock(&self.inner)
            .timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Replace the message. An empty string clears it.
    ///
    /// Must be called from within a tokio runtime when `message` is non-empty.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        let mut inner = lock(&self.inner);

        let next = (!message.is_empty()).then_some(message);
        if inner.message == next {
            return;
        }

        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        inner.generation = inner.generation.wrapping_add(1);
        inner.message = next;

        if inner.message.is_some() {
            let generation = inner.generation;
            let shared = Arc::downgrade(&self.inner);
            inner.timer = Some(tokio::spawn(dismiss_after(shared, generation, self.ttl)));
        }
    }

    pub fn clear(&self) {
        self.set(String::new());
    }
}

impl Drop for StatusNotifier {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.inner).timer.take() {
            timer.abort();
        }
    }
}

async fn dismiss_after(shared: Weak<Mutex<NotifierInner>>, generation: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut inner = lock(&shared);
    if inner.generation != generation {
        return;
    }
    inner.message = None;
    inner.timer = None;
    debug!(generation, "status message dismissed");
}

fn lock(inner: &Mutex<NotifierInner>) -> MutexGuard<'_, NotifierInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
