//! Repository for the `attribute_values` table.

use attrdb_core::types::DbId;
use attrdb_core::values::{DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE};
use sqlx::SqlitePool;

use crate::models::attribute_value::{AttributeValue, CreateAttributeValue, UpdateAttributeValue};

/// Column list for the `attribute_values` table.
const COLUMNS: &str = "id, attribute_set_id, attribute_id, attribute_category, \
    base_value, min_value, max_value, comment";

/// Provides CRUD operations for attribute values.
pub struct AttributeValueRepo;

impl AttributeValueRepo {
    /// Attach an attribute to a set, returning the created row.
    ///
    /// The attribute's category is copied into `attribute_category` by the
    /// same statement. Returns `None` if the attribute does not exist; a
    /// missing set or a duplicate (set, attribute) pair surfaces as a
    /// constraint error.
    pub async fn attach(
        pool: &SqlitePool,
        input: &CreateAttributeValue,
    ) -> Result<Option<AttributeValue>, sqlx::Error> {
        let query = format!(
            "INSERT INTO attribute_values \
                (attribute_set_id, attribute_id, attribute_category, \
                 base_value, min_value, max_value, comment) \
             SELECT ?1, a.id, a.category, ?3, ?4, ?5, ?6 \
             FROM attributes a WHERE a.id = ?2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(&input.attribute_set_id)
            .bind(&input.attribute_id)
            .bind(input.base_value)
            .bind(input.min_value.unwrap_or(DEFAULT_MIN_VALUE))
            .bind(input.max_value.unwrap_or(DEFAULT_MAX_VALUE))
            .bind(&input.comment)
            .fetch_optional(pool)
            .await
    }

    /// Find an attribute value by its surrogate id.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<AttributeValue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attribute_values WHERE id = ?");
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the values of an attribute set, ordered by attribute id.
    pub async fn list_by_set(
        pool: &SqlitePool,
        attribute_set_id: &str,
    ) -> Result<Vec<AttributeValue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attribute_values \
             WHERE attribute_set_id = ? \
             ORDER BY attribute_id"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(attribute_set_id)
            .fetch_all(pool)
            .await
    }

    /// List every value referencing an attribute, ordered by set id.
    pub async fn list_by_attribute(
        pool: &SqlitePool,
        attribute_id: &str,
    ) -> Result<Vec<AttributeValue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attribute_values \
             WHERE attribute_id = ? \
             ORDER BY attribute_set_id"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(attribute_id)
            .fetch_all(pool)
            .await
    }

    /// List every attribute value, ordered by surrogate id.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<AttributeValue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attribute_values ORDER BY id");
        sqlx::query_as::<_, AttributeValue>(&query).fetch_all(pool).await
    }

    /// Update the numbers of a value. Only non-`None` fields are applied.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateAttributeValue,
    ) -> Result<Option<AttributeValue>, sqlx::Error> {
        let query = format!(
            "UPDATE attribute_values SET \
                base_value = COALESCE(?2, base_value), \
                min_value = COALESCE(?3, min_value), \
                max_value = COALESCE(?4, max_value), \
                comment = COALESCE(?5, comment) \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(id)
            .bind(input.base_value)
            .bind(input.min_value)
            .bind(input.max_value)
            .bind(&input.comment)
            .fetch_optional(pool)
            .await
    }

    /// Detach a single value from its set.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attribute_values WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
