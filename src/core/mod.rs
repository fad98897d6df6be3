//! Cross-cutting support: logging setup and shutdown coordination.

pub mod logging;
pub mod shutdown;
