//! Test modules for the processor
