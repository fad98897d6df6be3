//! sysbus - an in-process message bus between independently developed systems
//!
//! Systems exchange structured messages through named per-system queues
//! instead of calling each other directly. The bus guarantees safe concurrent
//! access to shared queues, isolates per-message handler failures, and
//! supports live bottleneck monitoring with alert callbacks.

pub mod bus;
pub mod core;
pub mod monitor;
pub mod processor;
