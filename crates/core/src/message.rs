//! Message and Conversation domain types.
//!
//! These are the value objects that flow through the loop:
//! user types a line → appended to the conversation → sent to the provider →
//! assistant reply and tool results appended → sent again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tool::ToolResult;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instructions, always first
    System,
    /// The end user
    User,
    /// The model
    Assistant,
    /// Tool execution result
    Tool,
}

/// A tool call requested by the assistant.
///
/// The `id` is generated by the backend and must be echoed back unchanged
/// on the matching tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlation ID issued by the backend
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a serialized JSON string
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// An assistant message with text only.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System { .. } => Role::System,
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }

    /// The text payload, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Tool { content, .. } => Some(content),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Tool calls carried by an assistant message; empty for every other role.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

impl From<ToolResult> for Message {
    fn from(result: ToolResult) -> Self {
        Message::Tool {
            tool_call_id: result.call_id,
            content: result.content,
        }
    }
}

/// An append-only, ordered log of messages.
///
/// Always starts with exactly one system message. There is no way to remove,
/// reorder or replace messages, and no way to append a second system message.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start a conversation seeded with the system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: vec![Message::system(system_prompt)],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        match &self.messages[0] {
            Message::System { content } => content,
            _ => unreachable!("conversation always starts with a system message"),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true: the system message is always present.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: Option<String>, tool_calls: Vec<ToolCallRequest>) {
        self.push(Message::Assistant {
            content,
            tool_calls,
        });
    }

    pub fn push_tool_result(&mut self, result: ToolResult) {
        self.push(result.into());
    }

    /// Tool calls from the latest assistant message that have no result yet,
    /// in request order.
    pub fn pending_tool_calls(&self) -> Vec<&ToolCallRequest> {
        let Some(idx) = self
            .messages
            .iter()
            .rposition(|m| m.role() == Role::Assistant)
        else {
            return Vec::new();
        };

        let answered: Vec<&str> = self.messages[idx + 1..]
            .iter()
            .filter_map(|m| match m {
                Message::Tool { tool_call_id, .. } => Some(tool_call_id.as_str()),
                _ => None,
            })
            .collect();

        self.messages[idx]
            .tool_calls()
            .iter()
            .filter(|tc| !answered.contains(&tc.id.as_str()))
            .collect()
    }

    fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_holds_only_the_system_prompt() {
        let conv = Conversation::new("be terse");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0], Message::system("be terse"));
        assert_eq!(conv.system_prompt(), "be terse");
        assert!(!conv.is_empty());
    }

    #[test]
    fn system_message_stays_first_as_conversation_grows() {
        let mut conv = Conversation::new("sys");
        conv.push_user("hi");
        conv.push_assistant(Some("hello".into()), vec![]);
        conv.push_user("again");

        assert_eq!(conv.len(), 4);
        assert_eq!(conv.messages()[0], Message::system("sys"));
        let systems = conv
            .messages()
            .iter()
            .filter(|m| m.role() == Role::System)
            .count();
        assert_eq!(systems, 1);
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new("sys");
        let created = conv.created_at();
        conv.push_user("First message");
        assert!(conv.updated_at() >= created);
    }

    #[test]
    fn pending_tool_calls_tracks_unanswered_requests() {
        let mut conv = Conversation::new("sys");
        conv.push_user("do things");
        conv.push_assistant(
            None,
            vec![
                ToolCallRequest::new("call_1", "read_file", "{}"),
                ToolCallRequest::new("call_2", "list_files", "{}"),
            ],
        );
        let pending: Vec<_> = conv.pending_tool_calls().iter().map(|t| t.id.clone()).collect();
        assert_eq!(pending, vec!["call_1", "call_2"]);

        conv.push_tool_result(ToolResult::success("call_1", "contents"));
        let pending: Vec<_> = conv.pending_tool_calls().iter().map(|t| t.id.clone()).collect();
        assert_eq!(pending, vec!["call_2"]);

        conv.push_tool_result(ToolResult::error("call_2", "boom"));
        assert!(conv.pending_tool_calls().is_empty());
    }

    #[test]
    fn message_accessors() {
        let msg = Message::Assistant {
            content: None,
            tool_calls: vec![ToolCallRequest::new("c", "list_files", "{}")],
        };
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.text(), None);
        assert_eq!(msg.tool_calls().len(), 1);
        assert!(Message::user("x").tool_calls().is_empty());
    }

    #[test]
    fn message_serializes_with_role_tag() {
        let json = serde_json::to_value(Message::tool_result("call_9", "ok")).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_9");

        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json.get("tool_calls").is_none());
    }
}
