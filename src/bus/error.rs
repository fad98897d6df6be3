//! Bus Error Types

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Input queue for '{system}' is full (max size: {max_size})")]
    QueueFull { system: String, max_size: usize },

    #[error("System not found: {name}")]
    SystemNotFound { name: String },

    #[error("Handler for payload kind '{kind}' failed: {message}")]
    HandlerFailed { kind: String, message: String },

    #[error("Bus is shutting down")]
    ShuttingDown,
}

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;
