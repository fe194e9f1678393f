//! Identity change planning (rename preview logic).
//!
//! Pure computation used by the preview builder and the executor: request
//! classification, id remap planning, collision detection and the
//! human-readable impact summary. The `core` crate has no database
//! dependencies; all evaluation is done against data passed in by the caller.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::identity::{validate_identifier, RemapStrategy};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A proposed identity change, as entered by the user.
///
/// For a category rename `old_id`/`new_id` are placeholders carried along
/// for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub old_id: String,
    pub new_id: String,
    pub old_category: String,
    pub new_category: String,
}

impl ChangeRequest {
    /// A category rename; the id fields are left empty.
    pub fn rename_category(old_category: impl Into<String>, new_category: impl Into<String>) -> Self {
        Self {
            old_id: String::new(),
            new_id: String::new(),
            old_category: old_category.into(),
            new_category: new_category.into(),
        }
    }

    /// A single-attribute rename inside `category`.
    pub fn rename_attribute(
        old_id: impl Into<String>,
        new_id: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            old_id: old_id.into(),
            new_id: new_id.into(),
            old_category: category.clone(),
            new_category: category,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        ChangeKind::classify(self)
    }

    /// Validate the target of the change (the field the user typed).
    pub fn validate_target(&self) -> Result<(), String> {
        match self.kind() {
            ChangeKind::NoOp => Ok(()),
            ChangeKind::CategoryRename => validate_identifier("Category", &self.new_category),
            ChangeKind::AttributeRename => validate_identifier("Attribute id", &self.new_id),
        }
    }
}

/// Which cascade a [`ChangeRequest`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Same id, same category.
    NoOp,
    /// Every attribute in `old_category` moves to `new_category`.
    CategoryRename,
    /// One attribute changes id within its category.
    AttributeRename,
}

impl ChangeKind {
    pub fn classify(request: &ChangeRequest) -> Self {
        if request.old_category != request.new_category {
            Self::CategoryRename
        } else if request.old_id != request.new_id {
            Self::AttributeRename
        } else {
            Self::NoOp
        }
    }
}

// ---------------------------------------------------------------------------
// Remap planning
// ---------------------------------------------------------------------------

/// One planned `old -> new` identifier change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRemap {
    pub old_id: String,
    pub new_id: String,
}

impl IdRemap {
    /// `true` when only the category changes and the id text stays put.
    pub fn keeps_id(&self) -> bool {
        self.old_id == self.new_id
    }
}

/// Plan the remap for the affected attribute ids of `request`.
///
/// A category rename derives each new id with `strategy`; a single-attribute
/// rename maps `old_id -> new_id` directly and never substitutes text.
pub fn plan_remap<'a, I>(request: &ChangeRequest, affected_ids: I, strategy: RemapStrategy) -> Vec<IdRemap>
where
    I: IntoIterator<Item = &'a str>,
{
    match request.kind() {
        ChangeKind::NoOp => Vec::new(),
        ChangeKind::AttributeRename => affected_ids
            .into_iter()
            .filter(|id| *id == request.old_id)
            .map(|id| IdRemap {
                old_id: id.to_string(),
                new_id: request.new_id.clone(),
            })
            .collect(),
        ChangeKind::CategoryRename => affected_ids
            .into_iter()
            .map(|id| IdRemap {
                old_id: id.to_string(),
                new_id: strategy.remap_id(id, &request.old_category, &request.new_category),
            })
            .collect(),
    }
}

/// Ids that must not already exist for `remaps` to be applied.
pub fn target_ids(remaps: &[IdRemap]) -> Vec<String> {
    remaps
        .iter()
        .filter(|r| !r.keeps_id())
        .map(|r| r.new_id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Collision detection
// ---------------------------------------------------------------------------

/// Why a planned remap cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collision {
    /// Another attribute already owns the target id.
    Existing { old_id: String, new_id: String },
    /// Two affected attributes would receive the same id.
    Duplicate {
        first: String,
        second: String,
        new_id: String,
    },
}

impl Collision {
    pub fn conflicting_id(&self) -> &str {
        match self {
            Self::Existing { new_id, .. } | Self::Duplicate { new_id, .. } => new_id,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Existing { old_id, new_id } => format!(
                "Cannot rename '{old_id}' to '{new_id}': an attribute with id '{new_id}' already exists"
            ),
            Self::Duplicate {
                first,
                second,
                new_id,
            } => format!(
                "Cannot rename both '{first}' and '{second}' to the same id '{new_id}'"
            ),
        }
    }
}

/// Find the first remap whose target id is taken.
///
/// `existing_ids` holds the subset of [`target_ids`] already present in the
/// store. Any existing holder of a target id counts, including an attribute
/// that is itself being renamed away, because new rows are inserted before
/// old rows are deleted.
pub fn detect_collision(remaps: &[IdRemap], existing_ids: &[String]) -> Option<Collision> {
    let existing: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();
    let mut claimed: HashMap<&str, &str> = HashMap::new();

    for remap in remaps.iter().filter(|r| !r.keeps_id()) {
        if existing.contains(remap.new_id.as_str()) {
            return Some(Collision::Existing {
                old_id: remap.old_id.clone(),
                new_id: remap.new_id.clone(),
            });
        }
        if let Some(first) = claimed.insert(remap.new_id.as_str(), remap.old_id.as_str()) {
            return Some(Collision::Duplicate {
                first: first.to_string(),
                second: remap.old_id.clone(),
                new_id: remap.new_id.clone(),
            });
        }
    }

    // Ids that stay put must not be claimed by another remap either.
    remaps
        .iter()
        .filter(|r| r.keeps_id())
        .find_map(|kept| {
            claimed.get(kept.old_id.as_str()).map(|other| Collision::Duplicate {
                first: kept.old_id.clone(),
                second: other.to_string(),
                new_id: kept.old_id.clone(),
            })
        })
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counts shown to the user before a change is committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCounts {
    pub attributes: usize,
    pub attribute_sets: usize,
    pub values: i64,
}

/// Compute a human-readable summary of a proposed change.
pub fn impact_summary(request: &ChangeRequest, counts: ImpactCounts) -> String {
    let action = match request.kind() {
        ChangeKind::NoOp => return "No changes requested".to_string(),
        ChangeKind::CategoryRename => format!(
            "Rename category '{}' to '{}'",
            request.old_category, request.new_category
        ),
        ChangeKind::AttributeRename => format!(
            "Rename attribute '{}' to '{}'",
            request.old_id, request.new_id
        ),
    };

    if counts.attributes == 0 {
        return format!("{action}: nothing to change, no matching attributes");
    }

    format!(
        "{action}: {} affected, referenced by {} with {}",
        plural(counts.attributes as i64, "attribute"),
        plural(counts.attribute_sets as i64, "attribute set"),
        plural(counts.values, "value"),
    )
}

fn plural(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
