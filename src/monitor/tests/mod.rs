//! Test modules for the monitor
