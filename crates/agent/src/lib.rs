//! The agent loop: the heart of toolloop.
//!
//! A session cycles through three states:
//!
//! 1. **AwaitingUserInput**: read a line, append it, go infer
//! 2. **Inferring**: send conversation + tool catalog to the backend, append
//!    the reply, print its text
//! 3. **DispatchingTools**: run each requested tool in order, append every
//!    result, then infer again without asking the user
//!
//! A reply with no tool calls hands control back to the user. Only a
//! backend failure ends the session with an error.

pub mod dispatcher;
pub mod invoker;
pub mod loop_runner;

#[cfg(test)]
mod test_helpers;

pub use dispatcher::ToolDispatcher;
pub use invoker::{InferenceInvoker, Invocation};
pub use loop_runner::{AgentLoop, LoopState, SessionEnd, Transition};
