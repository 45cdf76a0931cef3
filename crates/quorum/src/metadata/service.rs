//! Service for reading and writing application metadata.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tracing::{instrument, warn};

use super::models::{ApiRouting, OnboardingState, ShortcutMap, Theme, VisibilityToggles};

const KEY_ONBOARDING: &str = "onboarding";
const KEY_THEME: &str = "theme";
const KEY_SHORTCUTS: &str = "shortcuts";
const KEY_VISIBILITY: &str = "visibility";
const KEY_API_ROUTING: &str = "api_routing";

/// Typed access to the `metadata` key-value table.
///
/// Each section is stored as one JSON value. Missing keys read back as the
/// section default; a value that fails to parse (written by a newer or
/// older build) is logged and also falls back to the default rather than
/// wedging the app.
#[derive(Debug, Clone)]
pub struct MetadataService {
    pool: SqlitePool,
}

impl MetadataService {
    /// Create a new metadata service on the app database pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn onboarding(&self) -> Result<OnboardingState> {
        self.get_section(KEY_ONBOARDING).await
    }

    #[instrument(skip(self, state))]
    pub async fn set_onboarding(&self, state: &OnboardingState) -> Result<()> {
        self.set_section(KEY_ONBOARDING, state).await
    }

    /// Mark the first-run flow as completed.
    pub async fn complete_onboarding(&self) -> Result<OnboardingState> {
        let mut state = self.onboarding().await?;
        state.completed = true;
        self.set_onboarding(&state).await?;
        Ok(state)
    }

    /// Record a dismissed one-time hint.
    pub async fn dismiss_hint(&self, hint_id: &str) -> Result<OnboardingState> {
        let mut state = self.onboarding().await?;
        state.dismiss_hint(hint_id);
        self.set_onboarding(&state).await?;
        Ok(state)
    }

    #[instrument(skip(self))]
    pub async fn theme(&self) -> Result<Theme> {
        self.get_section(KEY_THEME).await
    }

    #[instrument(skip(self))]
    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set_section(KEY_THEME, &theme).await
    }

    #[instrument(skip(self))]
    pub async fn shortcuts(&self) -> Result<ShortcutMap> {
        self.get_section(KEY_SHORTCUTS).await
    }

    #[instrument(skip(self, shortcuts))]
    pub async fn set_shortcuts(&self, shortcuts: &ShortcutMap) -> Result<()> {
        self.set_section(KEY_SHORTCUTS, shortcuts).await
    }

    /// Bind one action, leaving the rest of the map unchanged.
    pub async fn set_shortcut(&self, action: &str, binding: &str) -> Result<ShortcutMap> {
        let mut shortcuts = self.shortcuts().await?;
        shortcuts
            .bindings
            .insert(action.to_string(), binding.to_string());
        self.set_shortcuts(&shortcuts).await?;
        Ok(shortcuts)
    }

    /// Remove one action's binding, reverting it to the built-in default.
    pub async fn clear_shortcut(&self, action: &str) -> Result<ShortcutMap> {
        let mut shortcuts = self.shortcuts().await?;
        shortcuts.bindings.remove(action);
        self.set_shortcuts(&shortcuts).await?;
        Ok(shortcuts)
    }

    #[instrument(skip(self))]
    pub async fn visibility(&self) -> Result<VisibilityToggles> {
        self.get_section(KEY_VISIBILITY).await
    }

    #[instrument(skip(self))]
    pub async fn set_visibility(&self, toggles: VisibilityToggles) -> Result<()> {
        self.set_section(KEY_VISIBILITY, &toggles).await
    }

    #[instrument(skip(self))]
    pub async fn api_routing(&self) -> Result<ApiRouting> {
        self.get_section(KEY_API_ROUTING).await
    }

    #[instrument(skip(self, routing))]
    pub async fn set_api_routing(&self, routing: &ApiRouting) -> Result<()> {
        self.set_section(KEY_API_ROUTING, routing).await
    }

    async fn get_section<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("fetching metadata value")?;

        let Some(raw) = raw else {
            return Ok(T::default());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, %err, "unreadable metadata value, using defaults");
                Ok(T::default())
            }
        }
    }

    async fn set_section<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("serializing metadata value")?;

        sqlx::query(
            r#"
            INSERT INTO metadata (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(&raw)
        .execute(&self.pool)
        .await
        .context("writing metadata value")?;
        Ok(())
    }
}
