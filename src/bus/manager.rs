//! QueueManager - registry and facade for all bus operations
//!
//! The QueueManager owns the registry of named systems and is the only
//! object other components touch directly: registration, send/receive,
//! error routing, queue maintenance and stats aggregation all go through
//! it. It is an explicit service object - construct one at process start
//! (typically as `Arc<QueueManager>`) and hand the handle to every
//! processor and the monitor.

use crate::bus::config::BusConfig;
use crate::bus::envelope::{Payload, QueueItem};
use crate::bus::error::{BusError, BusResult};
use crate::bus::registry::SystemEntry;
use crate::bus::stats::{Bottleneck, BottleneckKind, GlobalStats, SystemStats};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Central coordination point for inter-system message passing.
///
/// # Thread Safety
///
/// Fully thread-safe behind `Arc<QueueManager>`. A single coarse registry
/// mutex guards every queue and counter mutation; no operation blocks while
/// holding it (worker wake-ups happen after the lock is released), so a
/// sender can never hold up the destination's own worker beyond the
/// critical section.
///
/// # Example
///
/// ```rust
/// use sysbus::bus::{Payload, QueueManager};
///
/// let bus = QueueManager::create();
/// bus.send_default("scanner", "indexer", Payload::empty("file_found")).unwrap();
///
/// let stats = bus.get_system_stats("indexer");
/// assert_eq!(stats.input_queue_size, 1);
/// ```
pub struct QueueManager {
    systems: Mutex<HashMap<String, SystemEntry>>,
    next_item_id: AtomicU64,
    config: BusConfig,
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueManager {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            systems: Mutex::new(HashMap::new()),
            next_item_id: AtomicU64::new(1),
            config,
        }
    }

    /// Create a shared QueueManager with default configuration.
    pub fn create() -> Arc<Self> {
        log::debug!("Queue manager started");
        Arc::new(Self::new())
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Register a system by name. Idempotent: an existing entry, including
    /// its queues and counters, is left untouched.
    pub fn register_system(&self, name: &str) {
        let mut systems = self.systems.lock().unwrap();
        if !systems.contains_key(name) {
            systems.insert(
                name.to_string(),
                SystemEntry::new(self.config.max_queue_size),
            );
            log::debug!("Registered system '{name}'");
        }
    }

    /// Names of all registered systems.
    pub fn registered_systems(&self) -> Vec<String> {
        self.systems.lock().unwrap().keys().cloned().collect()
    }

    pub fn system_count(&self) -> usize {
        self.systems.lock().unwrap().len()
    }

    /// Build an envelope and enqueue it on the destination's input queue.
    ///
    /// Unknown destinations are auto-registered. Returns the generated item
    /// id, or `BusError::QueueFull` when the destination's input queue is at
    /// capacity - the bus applies no retry policy, so the sender decides
    /// whether to back off and re-send.
    pub fn send_to_system(
        &self,
        source: &str,
        destination: &str,
        payload: Payload,
        priority: i64,
    ) -> BusResult<String> {
        let id = self.next_item_id();
        let item = QueueItem::new(
            id.clone(),
            source.to_string(),
            destination.to_string(),
            payload,
            priority,
        );

        let signal = {
            let mut systems = self.systems.lock().unwrap();
            let entry = systems
                .entry(destination.to_string())
                .or_insert_with(|| SystemEntry::new(self.config.max_queue_size));
            if entry.input.is_full() {
                return Err(BusError::QueueFull {
                    system: destination.to_string(),
                    max_size: self.config.max_queue_size,
                });
            }
            entry.input.push(item);
            Arc::clone(&entry.input_signal)
        };

        // Wake the destination's worker outside the critical section
        signal.notify_one();
        log::trace!("Sent item {id} from '{source}' to '{destination}' (priority {priority})");
        Ok(id)
    }

    /// `send_to_system` with the configured default priority.
    pub fn send_default(
        &self,
        source: &str,
        destination: &str,
        payload: Payload,
    ) -> BusResult<String> {
        self.send_to_system(source, destination, payload, self.config.default_priority)
    }

    /// Non-blocking pop of the highest-priority input item, or `None` when
    /// the queue is empty or the system is unknown.
    pub fn get_from_input_queue(&self, name: &str) -> Option<QueueItem> {
        let mut systems = self.systems.lock().unwrap();
        systems.get_mut(name)?.input.pop()
    }

    pub fn get_from_output_queue(&self, name: &str) -> Option<QueueItem> {
        let mut systems = self.systems.lock().unwrap();
        systems.get_mut(name)?.output.pop()
    }

    pub fn get_from_error_queue(&self, name: &str) -> Option<QueueItem> {
        let mut systems = self.systems.lock().unwrap();
        systems.get_mut(name)?.error.pop()
    }

    /// Append a processed result to a system's output queue.
    ///
    /// The output queue drops its oldest entry rather than rejecting when at
    /// capacity, so producing a result can never fail.
    pub fn put_to_output_queue(&self, name: &str, item: QueueItem) {
        let mut systems = self.systems.lock().unwrap();
        let entry = systems
            .entry(name.to_string())
            .or_insert_with(|| SystemEntry::new(self.config.max_queue_size));
        if let Some(dropped) = entry.output.push_evicting(item) {
            log::warn!(
                "Output queue for '{name}' at capacity; dropped oldest item {}",
                dropped.id
            );
        }
    }

    /// Annotate a failed item and append it to the system's error queue,
    /// incrementing the error counter.
    ///
    /// Drop-oldest at capacity: failure bookkeeping must never itself fail.
    pub fn put_to_error_queue(&self, name: &str, mut item: QueueItem, error: &str) {
        item.annotate_error(error);
        let mut systems = self.systems.lock().unwrap();
        let entry = systems
            .entry(name.to_string())
            .or_insert_with(|| SystemEntry::new(self.config.max_queue_size));
        entry.errors += 1;
        if let Some(dropped) = entry.error.push_evicting(item) {
            log::warn!(
                "Error queue for '{name}' at capacity; dropped oldest item {}",
                dropped.id
            );
        }
    }

    /// Record a successfully processed item: bump the counter and refresh
    /// the system's last-activity timestamp.
    pub fn record_processed(&self, name: &str) {
        let mut systems = self.systems.lock().unwrap();
        if let Some(entry) = systems.get_mut(name) {
            entry.processed += 1;
            entry.touch();
        }
    }

    /// Refresh a system's last-activity timestamp without counting an item.
    pub fn touch(&self, name: &str) {
        let mut systems = self.systems.lock().unwrap();
        if let Some(entry) = systems.get_mut(name) {
            entry.touch();
        }
    }

    /// Per-system wake-up handle used by workers for bounded waits.
    ///
    /// Auto-registers the system so a worker can park before the first send.
    pub fn input_signal(&self, name: &str) -> Arc<Notify> {
        let mut systems = self.systems.lock().unwrap();
        let entry = systems
            .entry(name.to_string())
            .or_insert_with(|| SystemEntry::new(self.config.max_queue_size));
        Arc::clone(&entry.input_signal)
    }

    /// Snapshot one system's queues and counters.
    ///
    /// Unknown names return the zero-valued snapshot rather than failing.
    pub fn get_system_stats(&self, name: &str) -> SystemStats {
        let systems = self.systems.lock().unwrap();
        match systems.get(name) {
            Some(entry) => Self::entry_stats(entry),
            None => SystemStats::default(),
        }
    }

    /// Aggregate every system's stats plus bottleneck classification.
    pub fn get_global_stats(&self) -> GlobalStats {
        let systems = self.systems.lock().unwrap();

        let mut global = GlobalStats::default();
        for (name, entry) in systems.iter() {
            let stats = Self::entry_stats(entry);
            global.total_items_processed += stats.processed;
            global.total_errors += stats.errors;

            if stats.input_queue_size > self.config.bottleneck_threshold {
                global.bottlenecks.push(Bottleneck {
                    system: name.clone(),
                    kind: BottleneckKind::InputQueueFull,
                    size: stats.input_queue_size,
                });
            }
            if stats.error_queue_size > self.config.bottleneck_threshold {
                global.bottlenecks.push(Bottleneck {
                    system: name.clone(),
                    kind: BottleneckKind::ErrorQueueFull,
                    size: stats.error_queue_size,
                });
            }

            global.system_health.insert(name.clone(), stats);
        }
        global
    }

    /// Drain all three queues of one system. The registration itself, along
    /// with its counters, is preserved.
    pub fn clear_system_queues(&self, name: &str) {
        let mut systems = self.systems.lock().unwrap();
        if let Some(entry) = systems.get_mut(name) {
            let drained =
                entry.input.len() + entry.output.len() + entry.error.len();
            entry.input.clear();
            entry.output.clear();
            entry.error.clear();
            log::debug!("Cleared {drained} queued items for system '{name}'");
        }
    }

    /// Drain every system's queues and zero its counters. Registrations are
    /// preserved. This is the one place counters may decrease.
    pub fn reset_all_queues(&self) {
        let mut systems = self.systems.lock().unwrap();
        for (name, entry) in systems.iter_mut() {
            entry.input.clear();
            entry.output.clear();
            entry.error.clear();
            entry.processed = 0;
            entry.errors = 0;
            log::trace!("Reset queues and counters for system '{name}'");
        }
    }

    fn entry_stats(entry: &SystemEntry) -> SystemStats {
        SystemStats {
            input_queue_size: entry.input.len(),
            output_queue_size: entry.output.len(),
            error_queue_size: entry.error.len(),
            idle_time: entry.last_activity.elapsed(),
            processed: entry.processed,
            errors: entry.errors,
        }
    }

    fn next_item_id(&self) -> String {
        let seq = self.next_item_id.fetch_add(1, Ordering::SeqCst);
        format!("item-{seq:016x}")
    }
}
