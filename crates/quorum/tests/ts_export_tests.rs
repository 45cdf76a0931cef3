//! TypeScript type generation tests.
//!
//! Run with: cargo test export_typescript_bindings -- --nocapture

use ts_rs::TS;

use quorum::catalog::CatalogModel;
use quorum::conversation::{
    Attachment, BlockType, LlmMessage, Message, MessagePart, MessageSet, MessageSetDetail,
    MessageState, ToolCall, ToolResult, ToolsBlock, UserBlock, UserMessage,
};
use quorum::group::{ModelGroup, ModelInstance};
use quorum::metadata::{ApiRouting, OnboardingState, ShortcutMap, Theme, VisibilityToggles};
use quorum::model_config::{CreateModelConfig, ModelConfig, UpdateModelConfig};

#[test]
fn export_typescript_bindings() {
    // Conversation types
    BlockType::export_all().expect("Failed to export BlockType");
    MessageState::export_all().expect("Failed to export MessageState");
    Attachment::export_all().expect("Failed to export Attachment");
    ToolCall::export_all().expect("Failed to export ToolCall");
    ToolResult::export_all().expect("Failed to export ToolResult");
    MessagePart::export_all().expect("Failed to export MessagePart");
    Message::export_all().expect("Failed to export Message");
    UserMessage::export_all().expect("Failed to export UserMessage");
    UserBlock::export_all().expect("Failed to export UserBlock");
    ToolsBlock::export_all().expect("Failed to export ToolsBlock");
    MessageSet::export_all().expect("Failed to export MessageSet");
    MessageSetDetail::export_all().expect("Failed to export MessageSetDetail");
    LlmMessage::export_all().expect("Failed to export LlmMessage");

    // Model configuration types
    ModelConfig::export_all().expect("Failed to export ModelConfig");
    CreateModelConfig::export_all().expect("Failed to export CreateModelConfig");
    UpdateModelConfig::export_all().expect("Failed to export UpdateModelConfig");

    // Group types
    ModelInstance::export_all().expect("Failed to export ModelInstance");
    ModelGroup::export_all().expect("Failed to export ModelGroup");

    // Metadata types
    OnboardingState::export_all().expect("Failed to export OnboardingState");
    Theme::export_all().expect("Failed to export Theme");
    ShortcutMap::export_all().expect("Failed to export ShortcutMap");
    VisibilityToggles::export_all().expect("Failed to export VisibilityToggles");
    ApiRouting::export_all().expect("Failed to export ApiRouting");

    // Catalog types
    CatalogModel::export_all().expect("Failed to export CatalogModel");
}
