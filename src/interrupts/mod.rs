//! Suspension seam for human-in-the-loop pauses.
//!
//! The adapter never pauses execution itself; it hands the interrupt payload to
//! an injected [`InterruptHandler`]. The contract mirrors LangGraph's
//! `interrupt()`: when no resume value is available the call fails with an
//! [`InterruptError`] carrying the payload, the host suspends the step, and the
//! step is re-run once the human's replies arrive — at which point the same
//! call returns them as `Ok`.

use serde_json::Value;

/// Error type for interrupts.
///
/// When the handler has no resume value for the current call, it returns this
/// error to signal that execution should be paused. The payload travels with
/// the error so the host can surface it to the human interface.
#[derive(thiserror::Error, Debug, Clone)]
#[error("interrupt: {0}")]
pub struct InterruptError(pub Value);

impl InterruptError {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// The interrupt payload.
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// The suspension mechanism, injected by the hosting runtime.
pub trait InterruptHandler: Send + Sync {
    /// Pause execution with `value` and wait for the human's reply.
    ///
    /// Returns `Ok(resume_value)` when the reply is already available (the
    /// step is being re-run after a resume). Returns `Err(InterruptError)`
    /// carrying `value` when execution must pause; the caller propagates the
    /// error to the host unchanged.
    fn interrupt(&self, value: Value) -> Result<Value, InterruptError>;
}
