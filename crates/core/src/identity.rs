//! Attribute identifier model.
//!
//! Attribute ids are human-meaningful strings of the form
//! `"<Category>.<Suffix>"` (e.g. `"Ship.Armor"`); [`AttributeKey`] splits
//! and formats them. The category column is authoritative, the prefix is a
//! naming convention.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between the category and the suffix of an attribute id.
pub const CATEGORY_SEPARATOR: char = '.';

/// Maximum identifier length accepted by [`validate_identifier`].
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Strategy names accepted by [`RemapStrategy::from_str_value`].
pub const STRATEGY_STRUCTURED: &str = "structured";
pub const STRATEGY_LEGACY: &str = "legacy";

// ---------------------------------------------------------------------------
// Structured identifier
// ---------------------------------------------------------------------------

/// An attribute id split at its first separator.
///
/// Ids without a separator have no category part; the whole id is the suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeKey {
    pub category: Option<String>,
    pub suffix: String,
}

impl AttributeKey {
    pub fn new(category: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            suffix: suffix.into(),
        }
    }

    /// Split `id` at the first separator.
    pub fn parse(id: &str) -> Self {
        match id.split_once(CATEGORY_SEPARATOR) {
            Some((category, suffix)) => Self::new(category, suffix),
            None => Self {
                category: None,
                suffix: id.to_string(),
            },
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{category}{CATEGORY_SEPARATOR}{}", self.suffix),
            None => f.write_str(&self.suffix),
        }
    }
}

// ---------------------------------------------------------------------------
// Remap strategy
// ---------------------------------------------------------------------------

/// How a category rename derives the new id of each affected attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemapStrategy {
    /// Rewrite only a leading `"<old_category>."` prefix (or an id equal to
    /// the category). Other ids keep their text.
    #[default]
    Structured,
    /// Replace every occurrence of the old category text inside the id.
    Legacy,
}

impl RemapStrategy {
    /// Convert from a configuration string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            STRATEGY_STRUCTURED => Ok(Self::Structured),
            STRATEGY_LEGACY => Ok(Self::Legacy),
            _ => Err(format!(
                "Invalid remap strategy '{s}'. Must be one of: {STRATEGY_STRUCTURED}, {STRATEGY_LEGACY}"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => STRATEGY_STRUCTURED,
            Self::Legacy => STRATEGY_LEGACY,
        }
    }

    /// Derive the id an attribute receives when its category is renamed.
    ///
    /// # Examples
    ///
    /// ```
    /// use attrdb_core::identity::RemapStrategy;
    ///
    /// let s = RemapStrategy::Structured;
    /// assert_eq!(s.remap_id("Ship.Armor", "Ship", "Vessel"), "Vessel.Armor");
    /// assert_eq!(s.remap_id("B.A.C", "A", "Z"), "B.A.C");
    /// assert_eq!(RemapStrategy::Legacy.remap_id("B.A.C", "A", "Z"), "B.Z.C");
    /// ```
    pub fn remap_id(&self, id: &str, old_category: &str, new_category: &str) -> String {
        match self {
            Self::Structured => {
                if id == old_category {
                    return new_category.to_string();
                }
                // Category names may themselves contain the separator.
                match id
                    .strip_prefix(old_category)
                    .and_then(|rest| rest.strip_prefix(CATEGORY_SEPARATOR))
                {
                    Some(suffix) => AttributeKey::new(new_category, suffix).to_string(),
                    None => id.to_string(),
                }
            }
            // `str::replace` with an empty pattern would interleave the new
            // text between every character.
            Self::Legacy if old_category.is_empty() => id.to_string(),
            Self::Legacy => id.replace(old_category, new_category),
        }
    }
}

impl FromStr for RemapStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_value(s)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the surface syntax of an attribute/set id or a category name.
///
/// `label` names the field in the error message ("Attribute id", "Category").
pub fn validate_identifier(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} must not be empty"));
    }
    if value.trim() != value {
        return Err(format!(
            "{label} '{value}' must not start or end with whitespace"
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(format!("{label} '{value}' contains control characters"));
    }
    if value.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "{label} exceeds maximum length of {MAX_IDENTIFIER_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_at_first_separator() {
        let key = AttributeKey::parse("Ship.Hull.Armor");
        assert_eq!(key.category.as_deref(), Some("Ship"));
        assert_eq!(key.suffix, "Hull.Armor");
        assert_eq!(key.to_string(), "Ship.Hull.Armor");
    }

    #[test]
    fn parse_without_separator() {
        let key = AttributeKey::parse("Armor");
        assert_eq!(key.category, None);
        assert_eq!(key.to_string(), "Armor");
    }

    #[test]
    fn structured_rewrites_prefix_only() {
        let s = RemapStrategy::Structured;
        assert_eq!(s.remap_id("Ship.Armor", "Ship", "Vessel"), "Vessel.Armor");
        assert_eq!(s.remap_id("Ship.Ship", "Ship", "Vessel"), "Vessel.Ship");
        assert_eq!(s.remap_id("Shipyard.Cost", "Ship", "Vessel"), "Shipyard.Cost");
    }

    #[test]
    fn structured_leaves_pathological_ids_alone() {
        assert_eq!(
            RemapStrategy::Structured.remap_id("B.A.C", "A", "Z"),
            "B.A.C"
        );
    }

    #[test]
    fn structured_handles_dotted_categories() {
        assert_eq!(
            RemapStrategy::Structured.remap_id("Ship.Hull.Armor", "Ship.Hull", "Hull"),
            "Hull.Armor"
        );
    }

    #[test]
    fn structured_renames_bare_category_id() {
        assert_eq!(RemapStrategy::Structured.remap_id("Gun", "Gun", "Weapon"), "Weapon");
    }

    #[test]
    fn legacy_replaces_every_occurrence() {
        let s = RemapStrategy::Legacy;
        assert_eq!(s.remap_id("Ship.Ship", "Ship", "Vessel"), "Vessel.Vessel");
        assert_eq!(s.remap_id("B.A.C", "A", "Z"), "B.Z.C");
    }

    #[test]
    fn legacy_with_empty_category_is_identity() {
        assert_eq!(RemapStrategy::Legacy.remap_id("Ship.Armor", "", "X"), "Ship.Armor");
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!(
            RemapStrategy::from_str_value("Structured").unwrap(),
            RemapStrategy::Structured
        );
        assert_eq!("legacy".parse::<RemapStrategy>().unwrap(), RemapStrategy::Legacy);
        assert!(RemapStrategy::from_str_value("regex").is_err());
    }

    #[test]
    fn strategy_serializes_snake_case() {
        let json = serde_json::to_string(&RemapStrategy::Legacy).unwrap();
        assert_eq!(json, "\"legacy\"");
    }

    #[test]
    fn validate_identifier_accepts_dotted_ids() {
        assert!(validate_identifier("Attribute id", "Ship.Armor").is_ok());
        assert!(validate_identifier("Category", "Ship Parts").is_ok());
    }

    #[test]
    fn validate_identifier_rejects_blank() {
        let err = validate_identifier("Category", "   ").unwrap_err();
        assert_eq!(err, "Category must not be empty");
    }

    #[test]
    fn validate_identifier_rejects_padding_and_control_chars() {
        assert!(validate_identifier("Attribute id", " Ship.Armor").is_err());
        assert!(validate_identifier("Attribute id", "Ship\tArmor").is_err());
    }

    #[test]
    fn validate_identifier_rejects_overlong() {
        let long = "x".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_identifier("Attribute id", &long).is_err());
        let max = "x".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier("Attribute id", &max).is_ok());
    }
}
