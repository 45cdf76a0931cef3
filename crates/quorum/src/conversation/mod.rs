//! Conversation model and LLM payload encoding.
//!
//! A chat is stored as an ordered sequence of message *sets*. Each set is
//! either a user turn or a "tools" turn holding one assistant response per
//! model instance in the active group. The encoder folds a snapshot of
//! those sets into the flat message list a model backend expects, and can
//! alternatively frame the latest turn as a synthesis request that asks a
//! model to merge the competing responses into one answer.
//!
//! Everything here is a pure read-side transform: sets are created and
//! mutated by the chat engine, the encoder only borrows them.

mod encoder;
mod models;

pub use encoder::{llm_conversation, llm_conversation_for_synthesis, perspective_labels};
pub use models::{
    Attachment, BlockType, LlmMessage, Message, MessagePart, MessageSet, MessageSetDetail,
    MessageState, ToolCall, ToolResult, ToolsBlock, UserBlock, UserMessage,
};
