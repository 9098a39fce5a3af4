use std::sync::Arc;

use serde_json::Value;

/// Immutable per-run context (user ids, session details, configuration).
///
/// Opaque to this crate: it is handed through to the
/// [`ActionRequestBuilder`](crate::agent::ActionRequestBuilder) untouched.
pub trait AgentContext: Send + Sync {
    /// Look up a context value by key.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Context with no entries.
pub struct EmptyContext;

impl AgentContext for EmptyContext {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }
}

/// Runtime information available to middleware.
#[derive(Clone)]
pub struct Runtime {
    context: Arc<dyn AgentContext>,
}

impl Runtime {
    pub fn new(context: Arc<dyn AgentContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &dyn AgentContext {
        self.context.as_ref()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Arc::new(EmptyContext))
    }
}
