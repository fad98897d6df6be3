//! Alert event model.

use crate::bus::BottleneckKind;
use std::fmt;
use std::time::SystemTime;

/// Severity of an alert; callbacks subscribe per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Notification passed to alert callbacks when a bottleneck is detected.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub level: AlertLevel,
    pub message: String,
    /// Name of the backlogged system.
    pub system: String,
    pub timestamp: SystemTime,
    /// Which queue tripped the threshold.
    pub kind: BottleneckKind,
    /// Observed queue size at detection time.
    pub queue_size: usize,
    /// Threshold the size exceeded.
    pub threshold: usize,
}

impl AlertEvent {
    pub fn new(
        level: AlertLevel,
        system: impl Into<String>,
        message: impl Into<String>,
        kind: BottleneckKind,
        queue_size: usize,
        threshold: usize,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            system: system.into(),
            timestamp: SystemTime::now(),
            kind,
            queue_size,
            threshold,
        }
    }
}
