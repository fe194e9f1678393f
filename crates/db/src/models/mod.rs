//! Domain model structs and DTOs.
//!
//! Each entity submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! `change_preview` and `summary` hold engine results and view rows.

pub mod attribute;
pub mod attribute_set;
pub mod attribute_value;
pub mod change_preview;
pub mod summary;
