//! Model catalog data models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One downloadable model as reported by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogModel {
    /// Source-side identifier (e.g. "openai/gpt-4o").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Provider key this model routes through.
    pub provider: String,
    /// Context window size in tokens.
    pub context_length: i64,
}
