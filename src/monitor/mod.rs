//! Queue Monitor - periodic bottleneck detection and alerting
//!
//! A background task polls the queue manager's aggregated stats on a fixed
//! interval, classifies backlogged systems as bottlenecks and fires the
//! alert callbacks registered for the matching severity: warnings for input
//! backlogs, criticals for error backlogs. Callback failures are logged and
//! never disturb the poller; a failing tick backs off briefly and the
//! poller carries on, so monitoring never dies silently.

mod alert;
mod poller;

pub use alert::{AlertEvent, AlertLevel};
pub use poller::{MonitorConfig, QueueMonitor};

#[cfg(test)]
mod tests;
