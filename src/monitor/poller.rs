//! QueueMonitor - the periodic polling task.

use crate::bus::{BottleneckKind, QueueManager};
use crate::core::shutdown::ShutdownToken;
use crate::monitor::alert::{AlertEvent, AlertLevel};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Callback fired per detected bottleneck at its registered severity.
pub type AlertCallback =
    Box<dyn Fn(&AlertEvent) -> Result<(), Box<dyn std::error::Error>> + Send + Sync>;

/// Monitor timing configuration. The bottleneck threshold itself lives in
/// `BusConfig` so the manager's stats and the monitor's alerts agree.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Poll interval between ticks.
    pub interval: Duration,
    /// Pause after a tick fails before polling again.
    pub failure_backoff: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            failure_backoff: Duration::from_secs(1),
        }
    }
}

/// Periodic poller that turns queue backlogs into alert callbacks.
///
/// Polling is read-only against the manager's stats snapshot, so monitoring
/// never blocks normal traffic beyond the registry lock's critical section.
///
/// # Example
///
/// ```rust,no_run
/// use sysbus::bus::QueueManager;
/// use sysbus::monitor::{AlertLevel, QueueMonitor};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let bus = QueueManager::create();
/// let monitor = Arc::new(QueueMonitor::new(Arc::clone(&bus)));
/// monitor.register_alert_callback(AlertLevel::Warning, |event| {
///     log::warn!("backlog on {}: {}", event.system, event.message);
///     Ok(())
/// });
/// monitor.start_monitoring();
/// // ...
/// monitor.stop_monitoring().await;
/// # }
/// ```
pub struct QueueMonitor {
    manager: Arc<QueueManager>,
    config: MonitorConfig,
    callbacks: Mutex<HashMap<AlertLevel, Vec<AlertCallback>>>,
    running: AtomicBool,
    shutdown: ShutdownToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl QueueMonitor {
    pub fn new(manager: Arc<QueueManager>) -> Self {
        Self::with_config(manager, MonitorConfig::default())
    }

    pub fn with_config(manager: Arc<QueueManager>, config: MonitorConfig) -> Self {
        Self {
            manager,
            config,
            callbacks: Mutex::new(HashMap::new()),
            running: AtomicBool::new(false),
            shutdown: ShutdownToken::new(),
            task: Mutex::new(None),
        }
    }

    /// Register a callback for one severity level. Callbacks accumulate;
    /// registering never replaces earlier ones.
    pub fn register_alert_callback<F>(&self, level: AlertLevel, callback: F)
    where
        F: Fn(&AlertEvent) -> Result<(), Box<dyn std::error::Error>> + Send + Sync + 'static,
    {
        let mut callbacks = self.callbacks.lock().unwrap();
        callbacks.entry(level).or_default().push(Box::new(callback));
    }

    /// Launch the periodic poller. Idempotent: a second call while running
    /// is a logged no-op, so the alert rate never doubles. The monitor is
    /// one-shot and cannot be restarted after `stop_monitoring`.
    pub fn start_monitoring(self: &Arc<Self>) {
        if self.shutdown.is_set() {
            log::warn!("Queue monitor was stopped and cannot restart");
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            log::warn!("Queue monitor already running");
            return;
        }

        let monitor = Arc::clone(self);
        let handle = tokio::spawn(async move {
            monitor.run().await;
        });
        *self.task.lock().unwrap() = Some(handle);
    }

    /// Signal the poller to stop after the current tick and wait for exit.
    pub async fn stop_monitoring(&self) {
        self.shutdown.trigger();
        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log::error!("Queue monitor exited abnormally: {e}");
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self) {
        log::debug!(
            "Queue monitor started (interval {:?})",
            self.config.interval
        );

        while !self.shutdown.is_set() {
            let tick = catch_unwind(AssertUnwindSafe(|| self.run_tick()));
            if tick.is_err() {
                // Never die silently: log, back off, keep polling
                log::error!("Queue monitor tick panicked; backing off");
                let _ = tokio::time::timeout(
                    self.config.failure_backoff,
                    self.shutdown.wait(),
                )
                .await;
                continue;
            }

            let _ = tokio::time::timeout(self.config.interval, self.shutdown.wait()).await;
        }

        log::debug!("Queue monitor stopped");
    }

    /// One poll pass: snapshot stats, classify bottlenecks, fire callbacks.
    ///
    /// Public so callers and tests can drive a tick deterministically
    /// without waiting out the interval.
    pub fn run_tick(&self) {
        let stats = self.manager.get_global_stats();
        let threshold = self.manager.config().bottleneck_threshold;

        for bottleneck in &stats.bottlenecks {
            let (level, message) = match bottleneck.kind {
                BottleneckKind::InputQueueFull => (
                    AlertLevel::Warning,
                    format!(
                        "Input backlog on '{}': {} items queued (threshold {})",
                        bottleneck.system, bottleneck.size, threshold
                    ),
                ),
                BottleneckKind::ErrorQueueFull => (
                    AlertLevel::Critical,
                    format!(
                        "Error backlog on '{}': {} failed items (threshold {})",
                        bottleneck.system, bottleneck.size, threshold
                    ),
                ),
            };

            log::warn!("{message}");
            let event = AlertEvent::new(
                level,
                bottleneck.system.clone(),
                message,
                bottleneck.kind,
                bottleneck.size,
                threshold,
            );
            self.fire(&event);
        }
    }

    /// Invoke every callback registered at the event's level, containing
    /// callback errors and panics at the call site.
    fn fire(&self, event: &AlertEvent) {
        let callbacks = self.callbacks.lock().unwrap();
        let Some(list) = callbacks.get(&event.level) else {
            return;
        };

        for callback in list {
            match catch_unwind(AssertUnwindSafe(|| callback(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    log::warn!(
                        "Alert callback failed for '{}' ({} alert): {error}",
                        event.system,
                        event.level
                    );
                }
                Err(_) => {
                    log::error!(
                        "Alert callback panicked for '{}' ({} alert)",
                        event.system,
                        event.level
                    );
                }
            }
        }
    }
}
