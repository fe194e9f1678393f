//! Repository for the `attributes` table.

use sqlx::SqlitePool;

use crate::models::attribute::{Attribute, CategorySummary, CreateAttribute, UpdateAttribute};
use crate::repositories::DependencyRepo;

/// Column list for the `attributes` table.
const COLUMNS: &str = "id, category, description";

/// Provides CRUD operations for attributes.
///
/// Identity changes (id or category) go through the identity engine, never
/// through this repository.
pub struct AttributeRepo;

impl AttributeRepo {
    /// Insert a new attribute, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateAttribute) -> Result<Attribute, sqlx::Error> {
        let query = format!(
            "INSERT INTO attributes (id, category, description) \
             VALUES (?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(&input.id)
            .bind(&input.category)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an attribute by its id.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Attribute>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        DependencyRepo::find_attribute_by_id(&mut conn, id).await
    }

    /// List all attributes ordered by category, then id.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Attribute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attributes ORDER BY category, id");
        sqlx::query_as::<_, Attribute>(&query).fetch_all(pool).await
    }

    /// List the attributes of one category.
    pub async fn list_by_category(
        pool: &SqlitePool,
        category: &str,
    ) -> Result<Vec<Attribute>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        DependencyRepo::find_attributes_by_category(&mut conn, category).await
    }

    /// List distinct categories with their attribute counts.
    pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategorySummary>, sqlx::Error> {
        sqlx::query_as::<_, CategorySummary>(
            "SELECT category, COUNT(*) AS attribute_count FROM attributes \
             GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await
    }

    /// Update an attribute's description. Returns `None` if not found.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        input: &UpdateAttribute,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!(
            "UPDATE attributes SET description = COALESCE(?2, description) \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(id)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }
}
