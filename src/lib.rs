//! # agent-inbox-middleware
//!
//! Human-in-the-loop middleware compatible with [agent-inbox]. It behaves like
//! LangChain's `HumanInTheLoopMiddleware`, but speaks the agent-inbox interrupt
//! format: after each reasoning step it inspects the proposed tool calls against
//! a review policy, pauses execution through an injected interrupt handler, and
//! folds the human's accept/edit/respond replies back into the tool-call stream.
//!
//! ## Overview
//!
//! - **Schemas** — conversation messages and the tool calls the adapter rewrites
//! - **Agent** — agent state, opaque runtime context, the HITL vocabulary
//!   (action requests, review configs, decisions), and the [`agent::Middleware`]
//!   trait with the [`agent::AgentInboxMiddleware`] adapter
//! - **Interrupts** — the suspension seam: pause is an `Err` carrying the
//!   interrupt payload, resume is an `Ok` with the human's replies
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use agent_inbox_middleware::agent::{
//!     AgentInboxMiddleware, AgentState, InterruptConfig, Middleware, Runtime,
//! };
//!
//! let middleware = AgentInboxMiddleware::new(handler)
//!     .with_interrupt_on("send_email", InterruptConfig::enabled());
//!
//! let mut state = AgentState::with_messages(messages);
//! match middleware.after_model(&mut state, &Runtime::default())? {
//!     Some(update) => { /* revised AI message + synthetic tool messages */ }
//!     None => { /* nothing needed review */ }
//! }
//! ```
//!
//! [agent-inbox]: https://github.com/langchain-ai/agent-inbox

/// Agent state, runtime context, HITL types, and middleware (including the agent-inbox adapter).
pub mod agent;

/// Suspension seam used to pause execution while waiting for human input.
pub mod interrupts;

/// Conversation message and tool-call schemas.
pub mod schemas;
