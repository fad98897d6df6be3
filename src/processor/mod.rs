//! Queue Processor - the per-system worker abstraction
//!
//! Each registered system runs one `QueueProcessor`: a dedicated tokio task
//! that pulls from the system's input queue with a bounded wait and invokes
//! a pluggable handler per item. Handler failures (errors and panics alike)
//! annotate the item and route it to the same system's error queue; the
//! loop always continues, so one bad payload never terminates a worker.

mod handler;
mod worker;

pub use handler::{DispatchHandler, FnHandler, HandlerError, ItemHandler, NoopHandler};
pub use worker::QueueProcessor;

#[cfg(test)]
mod tests;
