//! Test modules for the bus
//!
//! Organised by functional area: ordering guarantees, registration
//! semantics, stats aggregation, queue maintenance and concurrent access.

mod concurrent;
mod ordering;
mod registration;
