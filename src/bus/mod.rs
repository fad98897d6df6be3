//! Inter-System Queue Bus
//!
//! The bus decouples independently developed systems by routing structured
//! messages through per-system queues instead of direct calls. Each
//! registered system owns three priority-ordered queues (input, output,
//! error) plus activity counters, all held in a single shared registry.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   System A   │     │   System B   │     │   System C   │
//! └──────┬───────┘     └──────┬───────┘     └──────┬───────┘
//!        │ send_to_system     │                    │
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                      QueueManager                       │
//! │   name -> SystemEntry { input | output | error queues,  │
//! │                         processed, errors, activity }   │
//! └────────┬───────────────────┬───────────────────┬────────┘
//!          │ input             │ input             │ input
//! ┌────────┴──────┐  ┌─────────┴─────┐  ┌──────────┴────┐
//! │  Processor A  │  │  Processor B  │  │  Processor C  │
//! └───────────────┘  └───────────────┘  └───────────────┘
//! ```
//!
//! Delivery to a single destination preserves send order within a priority
//! class (higher priority served first); there is no cross-system ordering
//! guarantee and no persistence.
//!
//! # Example
//!
//! ```rust
//! use sysbus::bus::{Payload, QueueManager};
//!
//! let bus = QueueManager::create();
//! bus.register_system("game_engine");
//!
//! let payload = Payload::new("tick", serde_json::json!({"frame": 1}));
//! let item_id = bus.send_default("ai_backend", "game_engine", payload).unwrap();
//!
//! let item = bus.get_from_input_queue("game_engine").unwrap();
//! assert_eq!(item.id, item_id);
//! ```

mod config;
mod envelope;
mod error;
mod manager;
mod registry;
mod stats;

pub use config::BusConfig;
pub use envelope::{Payload, QueueItem, CORRELATION_ID_KEY, DEFAULT_PRIORITY, ERROR_METADATA_KEY};
pub use error::{BusError, BusResult};
pub use manager::QueueManager;
pub use stats::{Bottleneck, BottleneckKind, GlobalStats, SystemStats};

#[cfg(test)]
mod tests;
