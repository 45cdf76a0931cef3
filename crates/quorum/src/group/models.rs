//! Model group data models.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

/// One slot in a group: a reference to a model configuration.
///
/// Instances have their own id so that two slots pointing at the same
/// configuration stay distinguishable (reordering, per-slot removal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelInstance {
    pub id: String,
    pub model_config_id: String,
}

impl ModelInstance {
    /// Create an instance with a fresh id.
    pub fn new(model_config_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model_config_id: model_config_id.into(),
        }
    }
}

/// A named preset of model instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelGroup {
    pub id: String,
    pub name: String,
    pub instances: Vec<ModelInstance>,
    /// When the group was created (RFC 3339).
    pub created_at: String,
    /// When the group was last changed (RFC 3339).
    pub updated_at: String,
}

/// Errors reading stored group data.
#[derive(Debug, Error)]
pub enum GroupDataError {
    /// The instances column holds JSON in neither the current nor the
    /// legacy shape.
    #[error("invalid instance data for group {group_id}: {source}")]
    InvalidInstances {
        group_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of parsing a stored instances column.
#[derive(Debug)]
pub(crate) struct ParsedInstances {
    pub instances: Vec<ModelInstance>,
    /// True when the row was in the legacy string-array shape and needs
    /// rewriting.
    pub migrated: bool,
}

/// Parse a stored instances column, accepting the legacy string-array
/// shape. Legacy entries become instances with fresh ids, preserving
/// order.
pub(crate) fn parse_instances(group_id: &str, raw: &str) -> Result<ParsedInstances, GroupDataError> {
    match serde_json::from_str::<Vec<ModelInstance>>(raw) {
        Ok(instances) => Ok(ParsedInstances {
            instances,
            migrated: false,
        }),
        Err(current_err) => match serde_json::from_str::<Vec<String>>(raw) {
            Ok(legacy) => Ok(ParsedInstances {
                instances: legacy.into_iter().map(ModelInstance::new).collect(),
                migrated: true,
            }),
            // Report the failure against the current shape; the legacy
            // parse failing is the expected case for valid rows.
            Err(_) => Err(GroupDataError::InvalidInstances {
                group_id: group_id.to_string(),
                source: current_err,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_shape() {
        let raw = r#"[{"id":"i-1","model_config_id":"cfg-a"}]"#;
        let parsed = parse_instances("g-1", raw).unwrap();
        assert!(!parsed.migrated);
        assert_eq!(parsed.instances.len(), 1);
        assert_eq!(parsed.instances[0].id, "i-1");
    }

    #[test]
    fn test_parse_legacy_shape_mints_instance_ids() {
        let raw = r#"["cfg-a","cfg-b","cfg-a"]"#;
        let parsed = parse_instances("g-1", raw).unwrap();
        assert!(parsed.migrated);

        let config_ids: Vec<&str> = parsed
            .instances
            .iter()
            .map(|i| i.model_config_id.as_str())
            .collect();
        assert_eq!(config_ids, ["cfg-a", "cfg-b", "cfg-a"]);

        // Duplicated configs still get distinct instance ids.
        assert_ne!(parsed.instances[0].id, parsed.instances[2].id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_instances("g-1", "{not json").unwrap_err();
        assert!(err.to_string().contains("g-1"));
    }

    #[test]
    fn test_parse_empty_array_is_current_shape() {
        let parsed = parse_instances("g-1", "[]").unwrap();
        assert!(!parsed.migrated);
        assert!(parsed.instances.is_empty());
    }
}
