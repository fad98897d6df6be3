//! Cooperative Shutdown Signalling
//!
//! Worker and monitor loops hold a clonable token, check it each iteration
//! and park on its notifier between items. Triggering the token flips the
//! flag and wakes every waiter, so shutdown is observed within one bounded
//! wait and never depends on forced preemption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Clonable cooperative shutdown token shared between a loop and its owner.
#[derive(Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<ShutdownInner>,
}

#[derive(Default)]
struct ShutdownInner {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter.
    pub fn trigger(&self) {
        // Release pairs with the Acquire in is_set() so waiters observe the
        // store as soon as they wake
        self.inner.requested.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Check whether shutdown has been requested.
    pub fn is_set(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Wait until shutdown is requested.
    pub async fn wait(&self) {
        while !self.is_set() {
            self.inner.notify.notified().await;
        }
    }
}
