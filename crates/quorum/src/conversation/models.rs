//! Conversation data models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Discriminant for a message set's sub-blocks.
///
/// Stored data may carry discriminants this build does not know about
/// (newer app versions, partial syncs). Those deserialize as [`Unknown`]
/// and are skipped by the encoder rather than failing the whole chat.
///
/// [`Unknown`]: BlockType::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum BlockType {
    /// A user turn.
    User,
    /// An assistant/tool turn (one response per model instance).
    Tools,
    /// Any unrecognized discriminant.
    #[serde(other)]
    Unknown,
}

/// Streaming state of an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MessageState {
    /// Tokens are still arriving; the message is mutated in place.
    Streaming,
    /// The message is complete and read-only.
    Idle,
}

/// A file attached to a user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attachment {
    pub id: String,
    /// Display name (usually the original file name).
    pub name: String,
    pub media_type: String,
    /// Where the payload lives (app-managed file path or data URL).
    pub url: String,
    /// Ephemeral attachments are only relevant to the most recent user
    /// turn and are stripped from earlier turns on re-encoding.
    #[serde(default)]
    pub ephemeral: bool,
}

/// A tool invocation emitted by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToolCall {
    /// Provider-assigned call identifier.
    pub id: String,
    /// Tool name qualified by its server/namespace (e.g. `fs.read_file`).
    pub namespaced_tool_name: String,
    /// JSON arguments for the call.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// The outcome of one tool call, fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToolResult {
    /// Matches the `id` of the originating [`ToolCall`].
    pub id: String,
    pub namespaced_tool_name: String,
    pub content: String,
}

/// One fragment of an assistant message.
///
/// A part with `tool_results` is a tool-response fragment; any other part
/// is assistant content (optionally ending in tool calls). Alternating
/// parts record multi-turn tool use inside a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessagePart {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolResult>>,
}

impl MessagePart {
    /// Whether this part carries tool results rather than assistant content.
    pub fn is_tool_response(&self) -> bool {
        self.tool_results.is_some()
    }
}

/// One assistant response (one model's "perspective" on the turn).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub id: String,
    /// Name of the model that produced this response.
    pub model: String,
    pub state: MessageState,
    /// Whether this perspective participates in encoding.
    pub selected: bool,
    pub parts: Vec<MessagePart>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// The user message of a user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserMessage {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Sub-block holding the (optional) user message of a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserBlock {
    pub message: Option<UserMessage>,
}

/// Sub-block holding the parallel assistant responses of a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToolsBlock {
    pub chat_messages: Vec<Message>,
}

/// One ordered unit of a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageSet {
    pub id: String,
    pub chat_id: String,
    /// What kind of set this is.
    pub kind: BlockType,
    /// Nesting depth (sub-conversations spawned from a perspective).
    pub level: i64,
    /// Which sub-block is currently active for encoding.
    pub selected_block_type: BlockType,
}

/// A message set with its sub-blocks resolved.
///
/// Resolution (joins against the message store) is the persistence layer's
/// job; the encoder consumes the result as an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageSetDetail {
    pub set: MessageSet,
    pub user_block: Option<UserBlock>,
    pub tools_block: Option<ToolsBlock>,
}

/// A message as sent to the model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export)]
pub enum LlmMessage {
    User {
        content: String,
        attachments: Vec<Attachment>,
    },
    Assistant {
        content: String,
        model: String,
        tool_calls: Vec<ToolCall>,
    },
    ToolResults {
        tool_results: Vec<ToolResult>,
    },
}
