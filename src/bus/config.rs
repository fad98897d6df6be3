//! Bus configuration

use crate::bus::envelope::DEFAULT_PRIORITY;

/// Tunables shared by the queue manager and the monitor.
///
/// Injected at construction; there is no global configuration state.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Capacity bound per queue. The input queue rejects sends when full;
    /// output and error queues drop their oldest entry instead.
    pub max_queue_size: usize,
    /// Queue size above which a system counts as a bottleneck.
    pub bottleneck_threshold: usize,
    /// Priority assigned by `send_default`.
    pub default_priority: i64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 10_000,
            bottleneck_threshold: 10,
            default_priority: DEFAULT_PRIORITY,
        }
    }
}
