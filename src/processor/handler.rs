//! Item handlers and payload-kind dispatch.

use crate::bus::QueueItem;
use async_trait::async_trait;
use std::collections::HashMap;

/// Error type handlers report; boxed so systems can surface any failure.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Handler invoked by a QueueProcessor for each input item.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    async fn handle(&self, item: &QueueItem) -> Result<(), HandlerError>;
}

/// Default handler: accepts any payload shape and does nothing.
///
/// Used as the dispatch fallback so an unrecognised payload kind is a safe
/// no-op instead of a failure.
pub struct NoopHandler;

#[async_trait]
impl ItemHandler for NoopHandler {
    async fn handle(&self, item: &QueueItem) -> Result<(), HandlerError> {
        log::debug!(
            "No handler for payload kind '{}' (item {}); ignoring",
            item.payload.kind,
            item.id
        );
        Ok(())
    }
}

/// Adapter turning a synchronous closure into an `ItemHandler`.
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&QueueItem) -> Result<(), HandlerError> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> ItemHandler for FnHandler<F>
where
    F: Fn(&QueueItem) -> Result<(), HandlerError> + Send + Sync,
{
    async fn handle(&self, item: &QueueItem) -> Result<(), HandlerError> {
        (self.func)(item)
    }
}

/// Routes items to handlers by payload kind.
///
/// A lookup table replaces ad-hoc branching on the discriminator: register
/// one handler per kind, unknown kinds fall through to the fallback
/// (`NoopHandler` unless overridden).
///
/// # Example
///
/// ```rust
/// use sysbus::bus::QueueItem;
/// use sysbus::processor::{DispatchHandler, FnHandler};
///
/// let dispatch = DispatchHandler::new()
///     .on("chat_message", Box::new(FnHandler::new(|item: &QueueItem| {
///         println!("chat: {}", item.payload.data);
///         Ok(())
///     })));
/// ```
pub struct DispatchHandler {
    handlers: HashMap<String, Box<dyn ItemHandler>>,
    fallback: Box<dyn ItemHandler>,
}

impl Default for DispatchHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchHandler {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Box::new(NoopHandler),
        }
    }

    /// Replace the fallback invoked for unregistered kinds.
    pub fn with_fallback(fallback: Box<dyn ItemHandler>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// Register a handler for one payload kind.
    pub fn on(mut self, kind: impl Into<String>, handler: Box<dyn ItemHandler>) -> Self {
        self.handlers.insert(kind.into(), handler);
        self
    }

    pub fn handles_kind(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }
}

#[async_trait]
impl ItemHandler for DispatchHandler {
    async fn handle(&self, item: &QueueItem) -> Result<(), HandlerError> {
        match self.handlers.get(&item.payload.kind) {
            Some(handler) => handler.handle(item).await,
            None => self.fallback.handle(item).await,
        }
    }
}
