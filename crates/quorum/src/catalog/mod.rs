//! Downloadable model catalog.
//!
//! The list of models a provider aggregator offers is fetched at most once
//! per app session and cached in memory. The fetch itself (HTTP, auth) is
//! the [`ModelSource`] collaborator's job; this module owns the
//! single-flight coordination so concurrent callers share one download
//! instead of racing through a module-level global.

mod models;
mod service;

pub use models::CatalogModel;
pub use service::{ModelCatalog, ModelSource};
