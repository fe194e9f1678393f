//! Attribute set entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attribute_sets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AttributeSet {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for creating a new attribute set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttributeSet {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an attribute set. The id is immutable here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttributeSet {
    pub name: Option<String>,
    pub description: Option<String>,
}
