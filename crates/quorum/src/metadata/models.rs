//! Application metadata data models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Onboarding progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OnboardingState {
    /// Whether the first-run flow has been completed.
    #[serde(default)]
    pub completed: bool,
    /// IDs of one-time hints the user dismissed.
    #[serde(default)]
    pub dismissed_hints: Vec<String>,
}

impl OnboardingState {
    /// Record a dismissed hint; already-dismissed ids are kept unique.
    pub fn dismiss_hint(&mut self, hint_id: &str) {
        if !self.dismissed_hints.iter().any(|id| id == hint_id) {
            self.dismissed_hints.push(hint_id.to_string());
        }
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    /// Follow the OS setting.
    #[default]
    System,
    Light,
    Dark,
}

/// Keyboard shortcut bindings, keyed by action id.
///
/// Binding strings are whatever the (out-of-scope) shortcut recorder
/// produced; this layer only stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShortcutMap {
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

/// Which optional UI chrome is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisibilityToggles {
    #[serde(default = "default_true")]
    pub sidebar: bool,
    #[serde(default)]
    pub timestamps: bool,
    #[serde(default)]
    pub token_counts: bool,
}

impl Default for VisibilityToggles {
    fn default() -> Self {
        Self {
            sidebar: true,
            timestamps: false,
            token_counts: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Custom API routing.
///
/// `base_url` reroutes every provider through one gateway;
/// `provider_overrides` reroutes individual providers. Per-model overrides
/// live on the model configuration itself and take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiRouting {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub provider_overrides: BTreeMap<String, String>,
}
