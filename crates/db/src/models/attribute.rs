//! Attribute entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attributes` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Attribute {
    pub id: String,
    pub category: String,
    pub description: Option<String>,
}

/// DTO for creating a new attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttribute {
    pub id: String,
    pub category: String,
    pub description: Option<String>,
}

/// DTO for updating an attribute.
///
/// Id and category are identity fields and only change through the
/// identity engine.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttribute {
    pub description: Option<String>,
}

/// A category with the number of attributes in it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub attribute_count: i64,
}
