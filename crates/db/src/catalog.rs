//! The attribute catalog: the single entry point for identity changes.
//!
//! Wraps the dependency queries, the preview builder and the executor
//! behind a small API and owns the connection pool. Previews run on a
//! pooled connection without a transaction; every mutating call opens and
//! closes its own transaction, so a preview and the apply that follows it
//! never share one.

use attrdb_core::change::ChangeRequest;

use crate::config::CatalogConfig;
use crate::engine::{ChangeExecutor, ChangeOutcome, DeleteOutcome, PreviewBuilder};
use crate::error::ChangeError;
use crate::models::attribute_set::AttributeSet;
use crate::models::change_preview::{ChangePreview, SetRenamePreview};
use crate::repositories::DependencyRepo;
use crate::DbPool;

/// Facade over one attribute database.
#[derive(Debug, Clone)]
pub struct AttributeCatalog {
    pool: DbPool,
    config: CatalogConfig,
}

impl AttributeCatalog {
    /// Open (creating if needed) the configured database and apply
    /// migrations.
    pub async fn open(config: CatalogConfig) -> Result<Self, sqlx::Error> {
        let pool = crate::create_pool(&config).await?;
        crate::run_migrations(&pool).await?;
        tracing::info!(
            database = %config.database_path.display(),
            strategy = config.remap_strategy.as_str(),
            "Attribute catalog opened"
        );
        Ok(Self { pool, config })
    }

    /// Wrap an existing, migrated pool.
    pub fn from_pool(pool: DbPool, config: CatalogConfig) -> Self {
        Self { pool, config }
    }

    /// The underlying pool, for the CRUD repositories.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    // -----------------------------------------------------------------------
    // Previews
    // -----------------------------------------------------------------------

    /// Compute what renaming `request` would affect. No writes.
    pub async fn preview_rename(&self, request: &ChangeRequest) -> Result<ChangePreview, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let preview =
            PreviewBuilder::preview_change(&mut conn, request, self.config.remap_strategy).await?;
        tracing::debug!(
            kind = ?preview.kind(),
            valid = preview.is_valid(),
            attributes = preview.affected_attributes().len(),
            values = preview.affected_value_count(),
            "Rename previewed"
        );
        Ok(preview)
    }

    /// Compute what renaming an attribute set would affect. No writes.
    pub async fn preview_set_rename(
        &self,
        old_id: &str,
        new_id: &str,
    ) -> Result<SetRenamePreview, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        PreviewBuilder::preview_set_rename(&mut conn, old_id, new_id).await
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Apply a confirmed rename preview in one transaction.
    pub async fn apply_change(&self, preview: &ChangePreview) -> Result<ChangeOutcome, ChangeError> {
        ChangeExecutor::execute_change(&self.pool, preview, &self.config).await
    }

    /// Apply a confirmed attribute set rename preview in one transaction.
    pub async fn apply_set_rename(
        &self,
        preview: &SetRenamePreview,
    ) -> Result<ChangeOutcome, ChangeError> {
        ChangeExecutor::execute_set_rename(&self.pool, preview, &self.config).await
    }

    pub async fn delete_category(&self, category: &str) -> Result<DeleteOutcome, ChangeError> {
        ChangeExecutor::delete_category(&self.pool, category).await
    }

    pub async fn delete_attribute(&self, attribute_id: &str) -> Result<DeleteOutcome, ChangeError> {
        ChangeExecutor::delete_attribute(&self.pool, attribute_id).await
    }

    pub async fn delete_attribute_set(
        &self,
        attribute_set_id: &str,
    ) -> Result<DeleteOutcome, ChangeError> {
        ChangeExecutor::delete_attribute_set(&self.pool, attribute_set_id).await
    }

    // -----------------------------------------------------------------------
    // Safety checks
    // -----------------------------------------------------------------------

    /// Attribute sets that would lose values if `attribute_ids` went away.
    pub async fn get_referencing_attribute_sets(
        &self,
        attribute_ids: &[String],
    ) -> Result<Vec<AttributeSet>, sqlx::Error> {
        if attribute_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.acquire().await?;
        DependencyRepo::find_referencing_attribute_sets(&mut conn, attribute_ids).await
    }

    /// Number of values referencing `attribute_ids`.
    pub async fn get_attribute_value_count(&self, attribute_ids: &[String]) -> Result<i64, sqlx::Error> {
        if attribute_ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.acquire().await?;
        DependencyRepo::count_attribute_values(&mut conn, attribute_ids).await
    }
}
