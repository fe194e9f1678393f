//! Rows of the read-only aggregate views.

use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attribute_usage` view.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AttributeUsage {
    pub attribute_id: String,
    pub category: String,
    pub set_count: i64,
    pub value_count: i64,
}

/// A row from the `attribute_set_summaries` view.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AttributeSetSummary {
    pub attribute_set_id: String,
    pub name: String,
    pub attribute_count: i64,
    pub category_count: i64,
}
