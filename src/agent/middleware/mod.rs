use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::agent::runtime::Runtime;
use crate::agent::state::{AgentState, StateUpdate};
use crate::interrupts::InterruptError;

/// Errors that can occur in middleware execution.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// A human reply requested a capability that is never offered (`ignore`).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A reply's payload does not match its declared kind, its kind is
    /// unrecognized, or a decision kind was never offered for that tool.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The human interface returned a different number of decisions than there
    /// are pending reviews. Consistency guard; never recovered from.
    #[error(
        "number of human decisions ({decisions}) does not match number of hanging tool calls ({pending})"
    )]
    DecisionCountMismatch { decisions: usize, pending: usize },

    /// Human-in-the-loop pause in flight; carries the interrupt payload.
    /// The host should save state, surface the payload to the human interface,
    /// and re-run the step once a reply is available.
    #[error("interrupt (human-in-the-loop)")]
    Interrupt(Value),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<InterruptError> for MiddlewareError {
    fn from(err: InterruptError) -> Self {
        MiddlewareError::Interrupt(err.into_value())
    }
}

/// Trait for middleware that can intercept agent execution between steps.
///
/// The post-reasoning hook runs once per reasoning step, after the model's new
/// AI message has been appended to the history.
///
/// # Return values
///
/// - `Ok(None)`: leave the step untouched
/// - `Ok(Some(update))`: emit the revised messages
/// - `Err(MiddlewareError)`: abort the step (or, for
///   [`MiddlewareError::Interrupt`], suspend it)
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Called after the model produced a reasoning message.
    fn after_model(
        &self,
        state: &mut AgentState,
        runtime: &Runtime,
    ) -> Result<Option<StateUpdate>, MiddlewareError> {
        let _ = (state, runtime);
        Ok(None)
    }

    /// Async entry point for [`Middleware::after_model`].
    ///
    /// Exists as a scheduling-context convenience; it adds no suspension
    /// behavior of its own and delegates to the synchronous hook.
    async fn aafter_model(
        &self,
        state: &mut AgentState,
        runtime: &Runtime,
    ) -> Result<Option<StateUpdate>, MiddlewareError> {
        self.after_model(state, runtime)
    }
}

pub mod agent_inbox;
pub use agent_inbox::{
    AgentInboxActionRequest, AgentInboxConfig, AgentInboxInterrupt, AgentInboxMiddleware,
    AgentInboxResponse,
};
