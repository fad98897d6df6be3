//! Stats snapshots and bottleneck classification types.
//!
//! Snapshots are best-effort: they reflect the registry state at the moment
//! the lock was held and may be stale by the time the caller reads them.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Point-in-time view of one system's queues and counters.
///
/// Unknown system names yield the zero-valued default so stats consumers
/// (the monitor in particular) keep working against partially initialised
/// systems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemStats {
    pub input_queue_size: usize,
    pub output_queue_size: usize,
    pub error_queue_size: usize,
    /// Time since the system last successfully processed an item.
    pub idle_time: Duration,
    pub processed: u64,
    pub errors: u64,
}

/// Aggregated view across every registered system.
#[derive(Debug, Clone, Default)]
pub struct GlobalStats {
    pub total_items_processed: u64,
    pub total_errors: u64,
    pub system_health: HashMap<String, SystemStats>,
    pub bottlenecks: Vec<Bottleneck>,
}

/// A system whose queue backlog exceeds the configured threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bottleneck {
    pub system: String,
    pub kind: BottleneckKind,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BottleneckKind {
    InputQueueFull,
    ErrorQueueFull,
}

impl fmt::Display for BottleneckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BottleneckKind::InputQueueFull => write!(f, "input_queue_full"),
            BottleneckKind::ErrorQueueFull => write!(f, "error_queue_full"),
        }
    }
}
