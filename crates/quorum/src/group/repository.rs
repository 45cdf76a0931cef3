//! Repository for model group operations.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use super::models::{ModelGroup, ModelInstance, parse_instances};
use crate::db::AppDb;

/// Raw row shape; `instances` is parsed (and possibly migrated) on read.
#[derive(Debug, FromRow)]
struct GroupRow {
    id: String,
    name: String,
    instances: String,
    created_at: String,
    updated_at: String,
}

/// Repository for model group CRUD.
pub struct ModelGroupRepository<'a> {
    db: &'a AppDb,
}

impl<'a> ModelGroupRepository<'a> {
    /// Create a new repository instance.
    pub fn new(db: &'a AppDb) -> Self {
        Self { db }
    }

    /// Create a group from the given instances.
    pub async fn create(&self, name: &str, instances: Vec<ModelInstance>) -> Result<ModelGroup> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let instances_json =
            serde_json::to_string(&instances).context("serializing group instances")?;

        sqlx::query(
            r#"
            INSERT INTO model_groups (id, name, instances, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&instances_json)
        .bind(&now)
        .bind(&now)
        .execute(self.db.pool())
        .await
        .context("inserting model group")?;

        self.get(&id).await
    }

    /// Get a group by ID, migrating legacy rows in place.
    pub async fn get(&self, id: &str) -> Result<ModelGroup> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, instances, created_at, updated_at FROM model_groups WHERE id = ?",
        )
        .bind(id)
        .fetch_one(self.db.pool())
        .await
        .context("fetching model group")?;

        self.hydrate(row).await
    }

    /// List all groups in creation order, migrating legacy rows in place.
    pub async fn list(&self) -> Result<Vec<ModelGroup>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, instances, created_at, updated_at FROM model_groups \
             ORDER BY created_at",
        )
        .fetch_all(self.db.pool())
        .await
        .context("listing model groups")?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            groups.push(self.hydrate(row).await?);
        }
        Ok(groups)
    }

    /// Rename a group.
    pub async fn rename(&self, id: &str, name: &str) -> Result<ModelGroup> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE model_groups SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(&now)
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("renaming model group")?;

        self.get(id).await
    }

    /// Replace a group's instance list.
    pub async fn set_instances(
        &self,
        id: &str,
        instances: Vec<ModelInstance>,
    ) -> Result<ModelGroup> {
        self.write_instances(id, &instances).await?;
        self.get(id).await
    }

    /// Append an instance referencing the given model configuration.
    pub async fn add_instance(&self, id: &str, model_config_id: &str) -> Result<ModelGroup> {
        let mut group = self.get(id).await?;
        group.instances.push(ModelInstance::new(model_config_id));
        self.write_instances(id, &group.instances).await?;
        self.get(id).await
    }

    /// Remove one instance by its instance id. Unknown ids are a no-op.
    pub async fn remove_instance(&self, id: &str, instance_id: &str) -> Result<ModelGroup> {
        let mut group = self.get(id).await?;
        group.instances.retain(|instance| instance.id != instance_id);
        self.write_instances(id, &group.instances).await?;
        self.get(id).await
    }

    /// Delete a group. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM model_groups WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("deleting model group")?;

        Ok(result.rows_affected() > 0)
    }

    /// Parse a row, rewriting it once if it was in the legacy shape.
    async fn hydrate(&self, row: GroupRow) -> Result<ModelGroup> {
        let parsed = parse_instances(&row.id, &row.instances)?;
        if parsed.migrated {
            debug!(group_id = %row.id, "migrating legacy string-array group to instances");
            self.write_instances(&row.id, &parsed.instances).await?;
        }

        Ok(ModelGroup {
            id: row.id,
            name: row.name,
            instances: parsed.instances,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn write_instances(&self, id: &str, instances: &[ModelInstance]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let instances_json =
            serde_json::to_string(instances).context("serializing group instances")?;

        sqlx::query("UPDATE model_groups SET instances = ?, updated_at = ? WHERE id = ?")
            .bind(&instances_json)
            .bind(&now)
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("writing group instances")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, AppDb) {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("test.db");
        let db = AppDb::open(&db_path).await.unwrap();
        (temp, db)
    }

    async fn insert_raw(db: &AppDb, id: &str, instances_json: &str) {
        sqlx::query(
            "INSERT INTO model_groups (id, name, instances, created_at, updated_at) \
             VALUES (?, 'Raw', ?, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .bind(id)
        .bind(instances_json)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_group_crud() {
        let (_temp, db) = setup().await;
        let repo = ModelGroupRepository::new(&db);

        let group = repo
            .create(
                "Comparison",
                vec![ModelInstance::new("cfg-a"), ModelInstance::new("cfg-b")],
            )
            .await
            .unwrap();
        assert_eq!(group.instances.len(), 2);

        let renamed = repo.rename(&group.id, "Side by side").await.unwrap();
        assert_eq!(renamed.name, "Side by side");

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);

        assert!(repo.delete(&group.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_remove_instance() {
        let (_temp, db) = setup().await;
        let repo = ModelGroupRepository::new(&db);

        let group = repo.create("Duo", vec![ModelInstance::new("cfg-a")]).await.unwrap();

        // The same config twice is allowed; that is the point of instances.
        let group = repo.add_instance(&group.id, "cfg-a").await.unwrap();
        assert_eq!(group.instances.len(), 2);
        assert_ne!(group.instances[0].id, group.instances[1].id);

        let removed_id = group.instances[0].id.clone();
        let group = repo.remove_instance(&group.id, &removed_id).await.unwrap();
        assert_eq!(group.instances.len(), 1);
        assert_ne!(group.instances[0].id, removed_id);
    }

    #[tokio::test]
    async fn test_legacy_row_is_migrated_on_read() {
        let (_temp, db) = setup().await;
        let repo = ModelGroupRepository::new(&db);

        insert_raw(&db, "g-legacy", r#"["cfg-a","cfg-b"]"#).await;

        let group = repo.get("g-legacy").await.unwrap();
        let config_ids: Vec<&str> = group
            .instances
            .iter()
            .map(|i| i.model_config_id.as_str())
            .collect();
        assert_eq!(config_ids, ["cfg-a", "cfg-b"]);

        // The row is rewritten in the current shape.
        let raw: String =
            sqlx::query_scalar("SELECT instances FROM model_groups WHERE id = 'g-legacy'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert!(raw.contains("model_config_id"));

        // Reading again parses the rewritten row without re-migrating;
        // instance ids are now stable.
        let again = repo.get("g-legacy").await.unwrap();
        assert_eq!(again.instances, group.instances);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_an_error() {
        let (_temp, db) = setup().await;
        let repo = ModelGroupRepository::new(&db);

        insert_raw(&db, "g-bad", "{broken").await;

        let err = repo.get("g-bad").await.unwrap_err();
        assert!(err.to_string().contains("g-bad"));
    }
}
