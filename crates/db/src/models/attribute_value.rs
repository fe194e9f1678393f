//! Attribute value entity model and DTOs.
//!
//! An attribute value attaches one attribute to one attribute set with
//! concrete numbers. `attribute_category` is a denormalized copy of the
//! attribute's category, maintained by the repository and the identity
//! engine.

use attrdb_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attribute_values` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AttributeValue {
    pub id: DbId,
    pub attribute_set_id: String,
    pub attribute_id: String,
    pub attribute_category: String,
    pub base_value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub comment: Option<String>,
}

/// DTO for attaching an attribute to a set.
///
/// Missing bounds fall back to the column defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttributeValue {
    pub attribute_set_id: String,
    pub attribute_id: String,
    pub base_value: f64,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub comment: Option<String>,
}

/// DTO for updating the numbers of an attribute value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttributeValue {
    pub base_value: Option<f64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub comment: Option<String>,
}
