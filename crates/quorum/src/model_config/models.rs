//! Model configuration data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;

/// A configured model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, TS)]
#[ts(export)]
pub struct ModelConfig {
    /// Unique configuration ID.
    pub id: String,
    /// Provider key (e.g. "openai", "anthropic", "openrouter").
    pub provider: String,
    /// Provider-side model identifier (e.g. "gpt-4o").
    pub model_id: String,
    /// Name shown in the UI and used as the sender label in encoding.
    pub display_name: String,
    /// API key override for this model; falls back to the provider default.
    pub api_key: Option<String>,
    /// Base-URL override for custom routing (self-hosted gateways).
    pub base_url: Option<String>,
    /// Disabled configurations are hidden from pickers but kept for
    /// existing groups that reference them.
    pub enabled: bool,
    /// Position in the settings list.
    pub sort_order: i64,
    /// When the configuration was created (RFC 3339).
    pub created_at: String,
    /// When the configuration was last changed (RFC 3339).
    pub updated_at: String,
}

/// Request to create a model configuration.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateModelConfig {
    pub provider: String,
    pub model_id: String,
    pub display_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Partial update of a model configuration. `None` fields are left as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateModelConfig {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}
