//! Application metadata and preferences.
//!
//! Small, UI-owned state that is not part of any chat: onboarding
//! progress, theme, keyboard shortcuts, visibility toggles, and custom API
//! routing. Each section is one JSON value in the `metadata` key-value
//! table; absent keys read back as defaults so fresh installs need no
//! seeding.

mod models;
mod service;

pub use models::{ApiRouting, OnboardingState, ShortcutMap, Theme, VisibilityToggles};
pub use service::MetadataService;
