//! Model configuration management.
//!
//! A model configuration is one connectable model: provider, provider-side
//! model id, display name, and optional per-model API routing (key and
//! base-URL override). Configurations are what group presets reference.

mod models;
mod repository;

pub use models::{CreateModelConfig, ModelConfig, UpdateModelConfig};
pub use repository::ModelConfigRepository;
