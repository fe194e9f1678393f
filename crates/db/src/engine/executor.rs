//! Change executor: transactional identity cascades.
//!
//! A rename never updates a primary key in place. It runs as
//! insert-new-parents, repoint-children, delete-old-parents inside one
//! transaction, so no child ever references a missing parent and nothing is
//! visible until commit. Deletes run children-first for the same reason.
//! Any failure rolls the transaction back before the error is returned.

use attrdb_core::change::{ChangeRequest, IdRemap};
use serde::Serialize;
use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::config::CatalogConfig;
use crate::engine::PreviewBuilder;
use crate::error::{ChangeError, Operation};
use crate::models::change_preview::{ChangePreview, SetRenamePreview};
use crate::repositories::DependencyRepo;
use crate::DbPool;

/// Rows touched by a rename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeOutcome {
    /// Parent rows (attributes or the attribute set) that changed identity
    /// or category.
    pub renamed: usize,
    /// Attribute values repointed or re-categorized.
    pub values_repointed: u64,
}

/// Rows removed by a cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub attributes_deleted: u64,
    pub attribute_sets_deleted: u64,
    pub values_deleted: u64,
}

/// Applies previews and cascade deletes. Every method owns exactly one
/// transaction.
pub struct ChangeExecutor;

impl ChangeExecutor {
    // -----------------------------------------------------------------------
    // Renames
    // -----------------------------------------------------------------------

    /// Apply a previously computed attribute or category rename.
    ///
    /// Invalid or empty previews are a no-op and open no transaction. The
    /// preview's remaps are applied as confirmed. With `revalidate_on_apply`
    /// the preview is recomputed inside the write transaction first; a new
    /// collision, a changed affected set or a different remap plan aborts
    /// with [`ChangeError::Stale`].
    pub async fn execute_change(
        pool: &DbPool,
        preview: &ChangePreview,
        config: &CatalogConfig,
    ) -> Result<ChangeOutcome, ChangeError> {
        let request = preview.request();
        let operation = match Operation::for_request(&request) {
            Some(operation) if preview.has_changes() => operation,
            _ => {
                tracing::debug!(summary = %preview.summary(), "Nothing to apply");
                return Ok(ChangeOutcome::default());
            }
        };

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ChangeError::database(&operation, e))?;
        let result = Self::rename_attributes(&mut tx, preview, &request, &operation, config).await;
        let outcome = finish(tx, result, &operation).await?;

        tracing::info!(
            %operation,
            renamed = outcome.renamed,
            values = outcome.values_repointed,
            "Identity change applied"
        );
        Ok(outcome)
    }

    async fn rename_attributes(
        tx: &mut Transaction<'_, Sqlite>,
        preview: &ChangePreview,
        request: &ChangeRequest,
        operation: &Operation,
        config: &CatalogConfig,
    ) -> Result<ChangeOutcome, ChangeError> {
        let db = |e: sqlx::Error| ChangeError::database(operation, e);

        if config.revalidate_on_apply {
            let fresh = PreviewBuilder::preview_change(&mut **tx, request, config.remap_strategy)
                .await
                .map_err(db)?;
            ensure_still_current(preview, &fresh, operation)?;
        }

        // The confirmed plan is applied as previewed, never re-derived.
        let remaps = preview.remaps();
        let new_category = request.new_category.as_str();

        // Step 1: new parent rows, copied from the current old rows.
        for remap in remaps.iter().filter(|r| !r.keeps_id()) {
            let inserted = copy_attribute(&mut **tx, remap, new_category)
                .await
                .map_err(db)?;
            if inserted == 0 {
                return Err(ChangeError::stale(
                    operation,
                    format!("attribute '{}' no longer exists", remap.old_id),
                ));
            }
        }

        // Step 2: repoint children (and re-categorize ids that stay put).
        let mut values_repointed = 0;
        for remap in remaps {
            values_repointed += repoint_values(&mut **tx, remap, new_category)
                .await
                .map_err(db)?;
            if remap.keeps_id() {
                recategorize_attribute(&mut **tx, &remap.old_id, new_category)
                    .await
                    .map_err(db)?;
            }
        }

        // Step 3: old parent rows.
        for remap in remaps.iter().filter(|r| !r.keeps_id()) {
            let deleted = sqlx::query("DELETE FROM attributes WHERE id = ?")
                .bind(&remap.old_id)
                .execute(&mut **tx)
                .await
                .map_err(db)?
                .rows_affected();
            if deleted == 0 {
                return Err(ChangeError::stale(
                    operation,
                    format!("attribute '{}' no longer exists", remap.old_id),
                ));
            }
        }

        Ok(ChangeOutcome {
            renamed: remaps.len(),
            values_repointed,
        })
    }

    /// Apply a previously computed attribute set rename with the same
    /// insert / repoint / delete cascade.
    pub async fn execute_set_rename(
        pool: &DbPool,
        preview: &SetRenamePreview,
        config: &CatalogConfig,
    ) -> Result<ChangeOutcome, ChangeError> {
        if !preview.has_changes() {
            tracing::debug!(summary = %preview.summary(), "Nothing to apply");
            return Ok(ChangeOutcome::default());
        }
        let operation = Operation::RenameAttributeSet {
            from: preview.old_id().to_string(),
            to: preview.new_id().to_string(),
        };

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ChangeError::database(&operation, e))?;
        let result = Self::rename_attribute_set(&mut tx, preview, &operation, config).await;
        let outcome = finish(tx, result, &operation).await?;

        tracing::info!(%operation, values = outcome.values_repointed, "Attribute set renamed");
        Ok(outcome)
    }

    async fn rename_attribute_set(
        tx: &mut Transaction<'_, Sqlite>,
        preview: &SetRenamePreview,
        operation: &Operation,
        config: &CatalogConfig,
    ) -> Result<ChangeOutcome, ChangeError> {
        let db = |e: sqlx::Error| ChangeError::database(operation, e);
        let (old_id, new_id) = (preview.old_id(), preview.new_id());

        let vanished = || ChangeError::stale(operation, format!("attribute set '{old_id}' no longer exists"));

        if config.revalidate_on_apply {
            let fresh = PreviewBuilder::preview_set_rename(&mut **tx, old_id, new_id)
                .await
                .map_err(db)?;
            if let Some(message) = fresh.error_message() {
                return Err(ChangeError::stale(operation, message));
            }
            if fresh.attribute_set().is_none() {
                return Err(vanished());
            }
        }

        let inserted = sqlx::query(
            "INSERT INTO attribute_sets (id, name, description) \
             SELECT ?1, name, description FROM attribute_sets WHERE id = ?2",
        )
        .bind(new_id)
        .bind(old_id)
        .execute(&mut **tx)
        .await
        .map_err(db)?
        .rows_affected();
        if inserted == 0 {
            return Err(vanished());
        }

        let values_repointed =
            sqlx::query("UPDATE attribute_values SET attribute_set_id = ?1 WHERE attribute_set_id = ?2")
                .bind(new_id)
                .bind(old_id)
                .execute(&mut **tx)
                .await
                .map_err(db)?
                .rows_affected();

        let deleted = sqlx::query("DELETE FROM attribute_sets WHERE id = ?")
            .bind(old_id)
            .execute(&mut **tx)
            .await
            .map_err(db)?
            .rows_affected();
        if deleted == 0 {
            return Err(vanished());
        }

        Ok(ChangeOutcome {
            renamed: 1,
            values_repointed,
        })
    }

    // -----------------------------------------------------------------------
    // Cascade deletes
    // -----------------------------------------------------------------------

    /// Delete every attribute in `category` and all values referencing them.
    ///
    /// An empty category still commits an (empty) transaction.
    pub async fn delete_category(pool: &DbPool, category: &str) -> Result<DeleteOutcome, ChangeError> {
        let operation = Operation::DeleteCategory(category.to_string());
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ChangeError::database(&operation, e))?;
        let result = delete_category_rows(&mut tx, category)
            .await
            .map_err(|e| ChangeError::database(&operation, e));
        let outcome = finish(tx, result, &operation).await?;

        tracing::info!(
            %operation,
            attributes = outcome.attributes_deleted,
            values = outcome.values_deleted,
            "Category deleted"
        );
        Ok(outcome)
    }

    /// Delete one attribute and all values referencing it.
    pub async fn delete_attribute(
        pool: &DbPool,
        attribute_id: &str,
    ) -> Result<DeleteOutcome, ChangeError> {
        let operation = Operation::DeleteAttribute(attribute_id.to_string());
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ChangeError::database(&operation, e))?;
        let result = delete_attribute_rows(&mut tx, attribute_id)
            .await
            .map_err(|e| ChangeError::database(&operation, e));
        let outcome = finish(tx, result, &operation).await?;

        tracing::info!(%operation, values = outcome.values_deleted, "Attribute deleted");
        Ok(outcome)
    }

    /// Delete one attribute set and all values it owns.
    pub async fn delete_attribute_set(
        pool: &DbPool,
        attribute_set_id: &str,
    ) -> Result<DeleteOutcome, ChangeError> {
        let operation = Operation::DeleteAttributeSet(attribute_set_id.to_string());
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ChangeError::database(&operation, e))?;
        let result = delete_attribute_set_rows(&mut tx, attribute_set_id)
            .await
            .map_err(|e| ChangeError::database(&operation, e));
        let outcome = finish(tx, result, &operation).await?;

        tracing::info!(%operation, values = outcome.values_deleted, "Attribute set deleted");
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Commit on success; roll back explicitly on failure before returning the
/// error.
async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    result: Result<T, ChangeError>,
    operation: &Operation,
) -> Result<T, ChangeError> {
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| ChangeError::database(operation, e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(%operation, error = %rollback_err, "Rollback failed");
            }
            tracing::warn!(%operation, error = %err, "Change rolled back");
            Err(err)
        }
    }
}

/// Compare a preview recomputed inside the write transaction with the one
/// the caller confirmed.
fn ensure_still_current(
    confirmed: &ChangePreview,
    fresh: &ChangePreview,
    operation: &Operation,
) -> Result<(), ChangeError> {
    if let Some(message) = fresh.error_message() {
        return Err(ChangeError::stale(operation, message));
    }

    let mut expected = confirmed.affected_attribute_ids();
    let mut found = fresh.affected_attribute_ids();
    expected.sort();
    found.sort();
    if expected != found {
        return Err(ChangeError::stale(
            operation,
            format!(
                "the preview covered {} attribute(s) but {} now match",
                expected.len(),
                found.len()
            ),
        ));
    }

    let mut planned = confirmed.remaps().to_vec();
    let mut current = fresh.remaps().to_vec();
    planned.sort_by(|a, b| a.old_id.cmp(&b.old_id));
    current.sort_by(|a, b| a.old_id.cmp(&b.old_id));
    if let Some((was, now)) = planned.iter().zip(&current).find(|(was, now)| was != now) {
        return Err(ChangeError::stale(
            operation,
            format!(
                "'{}' was previewed as '{}' but would now become '{}'",
                was.old_id, was.new_id, now.new_id
            ),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// Insert `remap.new_id` under `category`, carrying over the old row's
/// description. Returns the number of rows inserted (0 if the old row is
/// gone).
async fn copy_attribute(
    conn: &mut SqliteConnection,
    remap: &IdRemap,
    category: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO attributes (id, category, description) \
         SELECT ?1, ?2, description FROM attributes WHERE id = ?3",
    )
    .bind(&remap.new_id)
    .bind(category)
    .bind(&remap.old_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Point every value of `remap.old_id` at `remap.new_id` under `category`.
async fn repoint_values(
    conn: &mut SqliteConnection,
    remap: &IdRemap,
    category: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE attribute_values SET attribute_id = ?1, attribute_category = ?2 \
         WHERE attribute_id = ?3",
    )
    .bind(&remap.new_id)
    .bind(category)
    .bind(&remap.old_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

async fn recategorize_attribute(
    conn: &mut SqliteConnection,
    id: &str,
    category: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE attributes SET category = ? WHERE id = ?")
        .bind(category)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

async fn delete_category_rows(
    conn: &mut SqliteConnection,
    category: &str,
) -> Result<DeleteOutcome, sqlx::Error> {
    let attributes = DependencyRepo::find_attributes_by_category(&mut *conn, category).await?;
    if attributes.is_empty() {
        return Ok(DeleteOutcome::default());
    }

    let values_deleted = sqlx::query(
        "DELETE FROM attribute_values WHERE attribute_id IN \
         (SELECT id FROM attributes WHERE category = ?)",
    )
    .bind(category)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let attributes_deleted = sqlx::query("DELETE FROM attributes WHERE category = ?")
        .bind(category)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(DeleteOutcome {
        attributes_deleted,
        attribute_sets_deleted: 0,
        values_deleted,
    })
}

async fn delete_attribute_rows(
    conn: &mut SqliteConnection,
    attribute_id: &str,
) -> Result<DeleteOutcome, sqlx::Error> {
    let values_deleted = sqlx::query("DELETE FROM attribute_values WHERE attribute_id = ?")
        .bind(attribute_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let attributes_deleted = sqlx::query("DELETE FROM attributes WHERE id = ?")
        .bind(attribute_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(DeleteOutcome {
        attributes_deleted,
        attribute_sets_deleted: 0,
        values_deleted,
    })
}

async fn delete_attribute_set_rows(
    conn: &mut SqliteConnection,
    attribute_set_id: &str,
) -> Result<DeleteOutcome, sqlx::Error> {
    let values_deleted = sqlx::query("DELETE FROM attribute_values WHERE attribute_set_id = ?")
        .bind(attribute_set_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let attribute_sets_deleted = sqlx::query("DELETE FROM attribute_sets WHERE id = ?")
        .bind(attribute_set_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(DeleteOutcome {
        attributes_deleted: 0,
        attribute_sets_deleted,
        values_deleted,
    })
}
