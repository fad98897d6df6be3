//! QueueProcessor worker loop.

use crate::bus::{BusResult, Payload, QueueItem, QueueManager, SystemStats};
use crate::core::shutdown::ShutdownToken;
use crate::processor::handler::ItemHandler;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Worker bound to exactly one system.
///
/// Construction registers the system with the bus; `start` spawns the
/// execution loop. The loop waits for input with a bounded timeout (never a
/// busy-spin), so the cooperative shutdown token is observed promptly, and
/// `shutdown` lets any in-flight item finish before the task exits.
///
/// # Example
///
/// ```rust,no_run
/// use sysbus::bus::QueueManager;
/// use sysbus::processor::{NoopHandler, QueueProcessor};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let bus = QueueManager::create();
/// let processor = QueueProcessor::new("game_engine", Arc::clone(&bus), Arc::new(NoopHandler));
/// processor.start();
/// // ... traffic flows ...
/// processor.shutdown().await;
/// # }
/// ```
pub struct QueueProcessor {
    system_name: String,
    manager: Arc<QueueManager>,
    handler: Arc<dyn ItemHandler>,
    poll_interval: Duration,
    shutdown: ShutdownToken,
    running: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl QueueProcessor {
    pub fn new(
        system_name: impl Into<String>,
        manager: Arc<QueueManager>,
        handler: Arc<dyn ItemHandler>,
    ) -> Self {
        let system_name = system_name.into();
        manager.register_system(&system_name);
        Self {
            system_name,
            manager,
            handler,
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown: ShutdownToken::new(),
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Override the bounded wait used when the input queue is empty.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// Spawn the worker task. A second call while running is a no-op, and
    /// a processor is one-shot: it cannot be restarted after `shutdown`.
    pub fn start(&self) {
        if self.shutdown.is_set() {
            log::warn!(
                "Processor for '{}' was shut down and cannot restart",
                self.system_name
            );
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            log::warn!("Processor for '{}' already running", self.system_name);
            return;
        }

        let name = self.system_name.clone();
        let manager = Arc::clone(&self.manager);
        let handler = Arc::clone(&self.handler);
        let shutdown = self.shutdown.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            run_loop(name, manager, handler, shutdown, poll_interval).await;
        });
        *self.task.lock().unwrap() = Some(handle);
    }

    /// Signal the loop to stop and wait for it to exit.
    ///
    /// Any item whose handler is mid-invocation completes first; queued
    /// items stay on the input queue for a later worker.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        // Wake a worker parked on its input signal
        self.manager.input_signal(&self.system_name).notify_waiters();

        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log::error!("Worker for '{}' exited abnormally: {e}", self.system_name);
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Send a message on behalf of this system.
    pub fn send_to_system(
        &self,
        destination: &str,
        payload: Payload,
        priority: i64,
    ) -> BusResult<String> {
        self.manager
            .send_to_system(&self.system_name, destination, payload, priority)
    }

    /// `send_to_system` with the bus default priority.
    pub fn send_default(&self, destination: &str, payload: Payload) -> BusResult<String> {
        self.manager
            .send_default(&self.system_name, destination, payload)
    }

    /// Snapshot of this system's own stats.
    pub fn stats(&self) -> SystemStats {
        self.manager.get_system_stats(&self.system_name)
    }
}

async fn run_loop(
    name: String,
    manager: Arc<QueueManager>,
    handler: Arc<dyn ItemHandler>,
    shutdown: ShutdownToken,
    poll_interval: Duration,
) {
    let signal = manager.input_signal(&name);
    log::debug!("Worker for '{name}' started");

    while !shutdown.is_set() {
        let Some(item) = manager.get_from_input_queue(&name) else {
            // Bounded wait: woken early by a send or by shutdown
            let _ = tokio::time::timeout(poll_interval, signal.notified()).await;
            continue;
        };
        process_item(&name, &manager, handler.as_ref(), item).await;
    }

    log::debug!("Worker for '{name}' stopped");
}

/// Invoke the handler for one item, containing both errors and panics.
async fn process_item(
    name: &str,
    manager: &QueueManager,
    handler: &dyn ItemHandler,
    item: QueueItem,
) {
    let outcome = AssertUnwindSafe(handler.handle(&item)).catch_unwind().await;
    match outcome {
        Ok(Ok(())) => {
            manager.record_processed(name);
            log::trace!("System '{name}' processed item {}", item.id);
        }
        Ok(Err(error)) => {
            log::warn!(
                "Handler for '{name}' rejected item {} (kind '{}'): {error}",
                item.id,
                item.payload.kind
            );
            manager.put_to_error_queue(name, item, &error.to_string());
        }
        Err(panic) => {
            let message = panic_message(panic);
            log::error!(
                "Handler for '{name}' panicked on item {} (kind '{}'): {message}",
                item.id,
                item.payload.kind
            );
            manager.put_to_error_queue(name, item, &message);
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
