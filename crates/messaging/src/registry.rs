//! Subject-to-handler registration table.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{MessagingError, Result};

/// Handles raw payloads received on one subject.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Returns a name for logging.
    fn name(&self) -> &'static str;

    /// Processes one message payload.
    async fn handle(&self, payload: &[u8]) -> Result<()>;
}

/// Maps each subject to the handler responsible for it.
///
/// Registering a second handler for a subject replaces the first.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a subject.
    pub fn register(&mut self, subject: impl Into<String>, handler: Arc<dyn MessageHandler>) {
        let subject = subject.into();
        tracing::info!(subject = %subject, handler = handler.name(), "registered message handler");
        self.handlers.insert(subject, handler);
    }

    /// Returns the registered subjects in sorted order.
    pub fn subjects(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Routes a payload to the handler registered for `subject`.
    pub async fn dispatch(&self, subject: &str, payload: &[u8]) -> Result<()> {
        let handler = self
            .handlers
            .get(subject)
            .ok_or_else(|| MessagingError::UnknownSubject(subject.to_string()))?;

        handler.handle(payload).await
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("subjects", &self.subjects())
            .finish()
    }
}
