//! Repository for the read-only aggregate views.

use sqlx::SqlitePool;

use crate::models::summary::{AttributeSetSummary, AttributeUsage};

/// Reads `attribute_usage` and `attribute_set_summaries`.
pub struct SummaryRepo;

impl SummaryRepo {
    /// Usage of every attribute, optionally restricted to one category.
    pub async fn attribute_usage(
        pool: &SqlitePool,
        category: Option<&str>,
    ) -> Result<Vec<AttributeUsage>, sqlx::Error> {
        sqlx::query_as::<_, AttributeUsage>(
            "SELECT attribute_id, category, set_count, value_count \
             FROM attribute_usage \
             WHERE ?1 IS NULL OR category = ?1 \
             ORDER BY category, attribute_id",
        )
        .bind(category)
        .fetch_all(pool)
        .await
    }

    /// Attribute and category counts for every attribute set.
    pub async fn attribute_set_summaries(
        pool: &SqlitePool,
    ) -> Result<Vec<AttributeSetSummary>, sqlx::Error> {
        sqlx::query_as::<_, AttributeSetSummary>(
            "SELECT attribute_set_id, name, attribute_count, category_count \
             FROM attribute_set_summaries \
             ORDER BY name, attribute_set_id",
        )
        .fetch_all(pool)
        .await
    }
}
