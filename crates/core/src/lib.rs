//! # toolloop Core
//!
//! Domain types, traits, and error definitions for the toolloop agent.
//! This crate defines the model every other crate implements against:
//! messages and the conversation log, tools and their schemas, the provider
//! boundary, and the user I/O boundary.
//!
//! Implementations live in their own crates (`toolloop-providers`,
//! `toolloop-tools`, `toolloop-agent`), all depending inward on this one.

pub mod console;
pub mod error;
pub mod message;
pub mod provider;
pub mod schema;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use console::{Console, RecordingConsole, ScriptedInput, TranscriptLine, UserInput};
pub use error::{ConsoleError, Error, ProviderError, Result, ToolError};
pub use message::{Conversation, ConversationId, Message, Role, ToolCallRequest};
pub use provider::{Completion, Provider, ProviderRequest, ToolDefinition, Usage};
pub use schema::{FieldType, InputSchema};
pub use tool::{Tool, ToolRegistry, ToolRegistryBuilder, ToolResult, parse_arguments};
