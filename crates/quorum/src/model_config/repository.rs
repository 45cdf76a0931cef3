//! Repository for model configuration operations.

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use super::models::{CreateModelConfig, ModelConfig, UpdateModelConfig};
use crate::db::AppDb;

const SELECT_COLUMNS: &str = "id, provider, model_id, display_name, api_key, base_url, \
                              enabled, sort_order, created_at, updated_at";

/// Repository for model configuration CRUD.
pub struct ModelConfigRepository<'a> {
    db: &'a AppDb,
}

impl<'a> ModelConfigRepository<'a> {
    /// Create a new repository instance.
    pub fn new(db: &'a AppDb) -> Self {
        Self { db }
    }

    /// Create a model configuration, appended to the end of the list.
    pub async fn create(&self, config: CreateModelConfig) -> Result<ModelConfig> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO model_configs
                (id, provider, model_id, display_name, api_key, base_url, enabled, sort_order,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1,
                    (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM model_configs), ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&config.provider)
        .bind(&config.model_id)
        .bind(&config.display_name)
        .bind(&config.api_key)
        .bind(&config.base_url)
        .bind(&now)
        .bind(&now)
        .execute(self.db.pool())
        .await
        .context("inserting model config")?;

        self.get(&id).await
    }

    /// Get a model configuration by ID.
    pub async fn get(&self, id: &str) -> Result<ModelConfig> {
        sqlx::query_as::<_, ModelConfig>(&format!(
            "SELECT {SELECT_COLUMNS} FROM model_configs WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(self.db.pool())
        .await
        .context("fetching model config")
    }

    /// List all model configurations in display order.
    pub async fn list(&self) -> Result<Vec<ModelConfig>> {
        sqlx::query_as::<_, ModelConfig>(&format!(
            "SELECT {SELECT_COLUMNS} FROM model_configs ORDER BY sort_order, created_at"
        ))
        .fetch_all(self.db.pool())
        .await
        .context("listing model configs")
    }

    /// List only enabled model configurations in display order.
    pub async fn list_enabled(&self) -> Result<Vec<ModelConfig>> {
        sqlx::query_as::<_, ModelConfig>(&format!(
            "SELECT {SELECT_COLUMNS} FROM model_configs WHERE enabled = 1 \
             ORDER BY sort_order, created_at"
        ))
        .fetch_all(self.db.pool())
        .await
        .context("listing enabled model configs")
    }

    /// Apply a partial update; unspecified fields are left unchanged.
    pub async fn update(&self, id: &str, update: UpdateModelConfig) -> Result<ModelConfig> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE model_configs SET
                display_name = COALESCE(?, display_name),
                api_key = COALESCE(?, api_key),
                base_url = COALESCE(?, base_url),
                enabled = COALESCE(?, enabled),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.display_name)
        .bind(&update.api_key)
        .bind(&update.base_url)
        .bind(update.enabled)
        .bind(&now)
        .bind(id)
        .execute(self.db.pool())
        .await
        .context("updating model config")?;

        self.get(id).await
    }

    /// Clear the API key override, falling back to the provider default.
    pub async fn clear_api_key(&self, id: &str) -> Result<ModelConfig> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE model_configs SET api_key = NULL, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("clearing model config api key")?;

        self.get(id).await
    }

    /// Delete a model configuration. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM model_configs WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("deleting model config")?;

        Ok(result.rows_affected() > 0)
    }

    /// Persist a new display order. IDs not listed keep their position
    /// relative to each other after the listed ones.
    pub async fn reorder(&self, ordered_ids: &[String]) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE model_configs SET sort_order = ?, updated_at = ? WHERE id = ?")
                .bind(position as i64)
                .bind(&now)
                .bind(id)
                .execute(self.db.pool())
                .await
                .context("reordering model configs")?;
        }
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

    fn sample(display_name: &str) -> CreateModelConfig {
        CreateModelConfig {
            provider: "openai".to_string(),
            model_id: "gpt-4o".to_string(),
            display_name: display_name.to_string(),
            api_key: None,
            base_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let created = repo.create(sample("GPT-4o")).await.unwrap();
        assert_eq!(created.display_name, "GPT-4o");
        assert!(created.enabled);
        assert_eq!(created.sort_order, 0);

        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_sort_order_appends() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let first = repo.create(sample("First")).await.unwrap();
        let second = repo.create(sample("Second")).await.unwrap();
        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].display_name, "First");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let created = repo.create(sample("GPT-4o")).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                UpdateModelConfig {
                    display_name: Some("Renamed".to_string()),
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.display_name, "Renamed");
        assert!(!updated.enabled);
        // Untouched fields survive.
        assert_eq!(updated.provider, "openai");
        assert_eq!(updated.model_id, "gpt-4o");
    }

    #[tokio::test]
    async fn test_list_enabled_filters() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let kept = repo.create(sample("Kept")).await.unwrap();
        let hidden = repo.create(sample("Hidden")).await.unwrap();
        repo.update(
            &hidden.id,
            UpdateModelConfig {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let enabled = repo.list_enabled().await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_clear_api_key() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let created = repo
            .create(CreateModelConfig {
                api_key: Some("sk-test".to_string()),
                ..sample("Keyed")
            })
            .await
            .unwrap();
        assert_eq!(created.api_key.as_deref(), Some("sk-test"));

        let cleared = repo.clear_api_key(&created.id).await.unwrap();
        assert_eq!(cleared.api_key, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let created = repo.create(sample("Doomed")).await.unwrap();
        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reorder() {
        let (_temp, db) = setup().await;
        let repo = ModelConfigRepository::new(&db);

        let a = repo.create(sample("A")).await.unwrap();
        let b = repo.create(sample("B")).await.unwrap();

        repo.reorder(&[b.id.clone(), a.id.clone()]).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
    }
}
