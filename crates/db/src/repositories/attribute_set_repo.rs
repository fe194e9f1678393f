//! Repository for the `attribute_sets` table.

use sqlx::SqlitePool;

use crate::models::attribute_set::{AttributeSet, CreateAttributeSet, UpdateAttributeSet};

/// Column list for the `attribute_sets` table.
const COLUMNS: &str = "id, name, description";

/// Provides CRUD operations for attribute sets.
pub struct AttributeSetRepo;

impl AttributeSetRepo {
    /// Insert a new attribute set, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateAttributeSet,
    ) -> Result<AttributeSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO attribute_sets (id, name, description) \
             VALUES (?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttributeSet>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an attribute set by its id.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<AttributeSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attribute_sets WHERE id = ?");
        sqlx::query_as::<_, AttributeSet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all attribute sets ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<AttributeSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attribute_sets ORDER BY name, id");
        sqlx::query_as::<_, AttributeSet>(&query).fetch_all(pool).await
    }

    /// Update an attribute set. Only non-`None` fields are applied.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        input: &UpdateAttributeSet,
    ) -> Result<Option<AttributeSet>, sqlx::Error> {
        let query = format!(
            "UPDATE attribute_sets SET \
                name = COALESCE(?2, name), \
                description = COALESCE(?3, description) \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttributeSet>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }
}
