//! Message Envelope Types
//!
//! The envelope is the atomic unit exchanged between systems. Apart from its
//! metadata map (error annotations, correlation ids) an envelope is immutable
//! once built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;

/// Priority assigned when the sender does not specify one.
pub const DEFAULT_PRIORITY: i64 = 5;

/// Metadata key under which processing failures are recorded.
pub const ERROR_METADATA_KEY: &str = "error";

/// Metadata key for correlating an envelope with an external request.
pub const CORRELATION_ID_KEY: &str = "correlation_id";

/// Structured payload with a mandatory kind discriminator.
///
/// The `kind` field drives handler dispatch on the receiving side (see
/// `processor::DispatchHandler`); `data` is an opaque JSON value whose shape
/// is a contract between the sending and receiving systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Payload {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Payload carrying only a discriminator, for signal-style messages.
    pub fn empty(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: serde_json::Value::Null,
        }
    }
}

/// Message envelope routed between systems.
///
/// Higher `priority` values are served first; envelopes of equal priority
/// are served in send order.
#[derive(Debug, Clone)]
pub struct QueueItem {
    /// Unique id assigned at send time.
    pub id: String,
    /// Name of the sending system.
    pub source: String,
    /// Name of the destination system.
    pub destination: String,
    pub payload: Payload,
    pub priority: i64,
    /// Timestamp taken when the envelope was built.
    pub enqueued_at: SystemTime,
    /// Mutable annotations: error messages, correlation ids.
    pub metadata: HashMap<String, String>,
}

impl QueueItem {
    pub(crate) fn new(
        id: String,
        source: String,
        destination: String,
        payload: Payload,
        priority: i64,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            payload,
            priority,
            enqueued_at: SystemTime::now(),
            metadata: HashMap::new(),
        }
    }

    /// Error annotation recorded when a handler rejected this envelope.
    pub fn error_annotation(&self) -> Option<&str> {
        self.metadata.get(ERROR_METADATA_KEY).map(String::as_str)
    }

    pub(crate) fn annotate_error(&mut self, error: &str) {
        self.metadata
            .insert(ERROR_METADATA_KEY.to_string(), error.to_string());
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.metadata.get(CORRELATION_ID_KEY).map(String::as_str)
    }

    pub fn set_correlation_id(&mut self, correlation_id: impl Into<String>) {
        self.metadata
            .insert(CORRELATION_ID_KEY.to_string(), correlation_id.into());
    }
}
