//! # Callback Dispatch
//!
//! Questions carry handler ids rather than function values; the asker
//! registers the matching [`ResolutionHandler`] under that id before
//! resolution. Dispatch isolates handler failures: the oracle's own state
//! transition has already committed by the time a handler runs, and a failing
//! handler only degrades the resolution notification.

use crate::error::Result;
use std::collections::HashMap;
use tracing::warn;

/// Asker-supplied resolution callbacks.
///
/// Either method may be invoked zero or one time per question. Failures are
/// swallowed by the dispatcher and must not be relied on to block resolution.
pub trait ResolutionHandler {
    /// Invoked with the accepted final-state image on success resolution
    fn on_success(&mut self, question_key: &str, image: &[u8]) -> Result<()>;

    /// Invoked when the question is resolved as failed
    fn on_failure(&mut self, question_key: &str) -> Result<()>;
}

/// Registry mapping handler ids to resolution handlers
#[derive(Default)]
pub struct CallbackRegistry {
    handlers: HashMap<String, Box<dyn ResolutionHandler>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a stable id, replacing any previous one
    pub fn register(&mut self, id: impl Into<String>, handler: Box<dyn ResolutionHandler>) {
        self.handlers.insert(id.into(), handler);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Invoke the success handler, reporting whether it ran cleanly.
    ///
    /// A missing handler or a handler error returns false; neither
    /// propagates to the resolving call.
    pub(crate) fn dispatch_success(&mut self, id: &str, question_key: &str, image: &[u8]) -> bool {
        match self.handlers.get_mut(id) {
            Some(handler) => match handler.on_success(question_key, image) {
                Ok(()) => true,
                Err(e) => {
                    warn!(handler = id, question_key, error = %e, "success handler failed");
                    false
                }
            },
            None => {
                warn!(handler = id, question_key, "success handler not registered");
                false
            }
        }
    }

    /// Invoke the failure handler. The outcome is logged but never surfaced.
    pub(crate) fn dispatch_failure(&mut self, id: &str, question_key: &str) -> bool {
        match self.handlers.get_mut(id) {
            Some(handler) => match handler.on_failure(question_key) {
                Ok(()) => true,
                Err(e) => {
                    warn!(handler = id, question_key, error = %e, "failure handler failed");
                    false
                }
            },
            None => {
                warn!(handler = id, question_key, "failure handler not registered");
                false
            }
        }
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
