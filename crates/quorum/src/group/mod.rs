//! Model group presets.
//!
//! A group is a named, ordered list of model *instances* used to run
//! several models (or several copies of one model) side by side. Instances
//! reference model configurations by id; the same configuration may appear
//! more than once, which is why instances carry their own identity.
//!
//! Groups used to be stored as a bare array of configuration-id strings.
//! Rows in that legacy shape are migrated to instance arrays the first
//! time they are read.

mod models;
mod repository;

pub use models::{GroupDataError, ModelGroup, ModelInstance};
pub use repository::ModelGroupRepository;
