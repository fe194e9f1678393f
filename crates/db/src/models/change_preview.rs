//! Rename previews.
//!
//! A preview is an immutable snapshot of what a proposed identity change
//! would touch. It is built by [`crate::engine::PreviewBuilder`] and is the
//! only input the executor accepts, so fields are read through accessors.

use attrdb_core::change::{impact_summary, ChangeKind, ChangeRequest, IdRemap, ImpactCounts};
use serde::Serialize;

use super::attribute::Attribute;
use super::attribute_set::AttributeSet;

/// The full impact of a proposed attribute or category rename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePreview {
    old_id: String,
    new_id: String,
    old_category: String,
    new_category: String,
    kind: ChangeKind,
    is_valid: bool,
    error_message: Option<String>,
    affected_attributes: Vec<Attribute>,
    affected_attribute_sets: Vec<AttributeSet>,
    affected_value_count: i64,
    remaps: Vec<IdRemap>,
}

impl ChangePreview {
    /// A valid preview that touches nothing (no-op or nothing found).
    pub(crate) fn empty(request: &ChangeRequest) -> Self {
        Self {
            old_id: request.old_id.clone(),
            new_id: request.new_id.clone(),
            old_category: request.old_category.clone(),
            new_category: request.new_category.clone(),
            kind: request.kind(),
            is_valid: true,
            error_message: None,
            affected_attributes: Vec::new(),
            affected_attribute_sets: Vec::new(),
            affected_value_count: 0,
            remaps: Vec::new(),
        }
    }

    pub(crate) fn with_impact(
        mut self,
        attributes: Vec<Attribute>,
        attribute_sets: Vec<AttributeSet>,
        value_count: i64,
        remaps: Vec<IdRemap>,
    ) -> Self {
        self.affected_attributes = attributes;
        self.affected_attribute_sets = attribute_sets;
        self.affected_value_count = value_count;
        self.remaps = remaps;
        self
    }

    pub(crate) fn invalid(mut self, message: impl Into<String>) -> Self {
        self.is_valid = false;
        self.error_message = Some(message.into());
        self
    }

    /// The request this preview was computed for.
    pub fn request(&self) -> ChangeRequest {
        ChangeRequest {
            old_id: self.old_id.clone(),
            new_id: self.new_id.clone(),
            old_category: self.old_category.clone(),
            new_category: self.new_category.clone(),
        }
    }

    pub fn old_id(&self) -> &str {
        &self.old_id
    }

    pub fn new_id(&self) -> &str {
        &self.new_id
    }

    pub fn old_category(&self) -> &str {
        &self.old_category
    }

    pub fn new_category(&self) -> &str {
        &self.new_category
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn affected_attributes(&self) -> &[Attribute] {
        &self.affected_attributes
    }

    pub fn affected_attribute_sets(&self) -> &[AttributeSet] {
        &self.affected_attribute_sets
    }

    pub fn affected_value_count(&self) -> i64 {
        self.affected_value_count
    }

    /// Planned `old -> new` id pairs, in affected-attribute order.
    pub fn remaps(&self) -> &[IdRemap] {
        &self.remaps
    }

    pub fn affected_attribute_ids(&self) -> Vec<String> {
        self.affected_attributes.iter().map(|a| a.id.clone()).collect()
    }

    /// Whether applying this preview would write anything.
    pub fn has_changes(&self) -> bool {
        self.is_valid && !self.affected_attributes.is_empty()
    }

    /// Human-readable impact line for confirmation prompts.
    pub fn summary(&self) -> String {
        let counts = ImpactCounts {
            attributes: self.affected_attributes.len(),
            attribute_sets: self.affected_attribute_sets.len(),
            values: self.affected_value_count,
        };
        let summary = impact_summary(&self.request(), counts);
        match &self.error_message {
            Some(message) => format!("{summary} (blocked: {message})"),
            None => summary,
        }
    }
}

/// The impact of renaming an attribute set's id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetRenamePreview {
    old_id: String,
    new_id: String,
    is_valid: bool,
    error_message: Option<String>,
    attribute_set: Option<AttributeSet>,
    affected_value_count: i64,
}

impl SetRenamePreview {
    pub(crate) fn new(old_id: &str, new_id: &str) -> Self {
        Self {
            old_id: old_id.to_string(),
            new_id: new_id.to_string(),
            is_valid: true,
            error_message: None,
            attribute_set: None,
            affected_value_count: 0,
        }
    }

    pub(crate) fn with_impact(mut self, attribute_set: AttributeSet, value_count: i64) -> Self {
        self.attribute_set = Some(attribute_set);
        self.affected_value_count = value_count;
        self
    }

    pub(crate) fn invalid(mut self, message: impl Into<String>) -> Self {
        self.is_valid = false;
        self.error_message = Some(message.into());
        self
    }

    pub fn old_id(&self) -> &str {
        &self.old_id
    }

    pub fn new_id(&self) -> &str {
        &self.new_id
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The set being renamed, `None` when it does not exist.
    pub fn attribute_set(&self) -> Option<&AttributeSet> {
        self.attribute_set.as_ref()
    }

    pub fn affected_value_count(&self) -> i64 {
        self.affected_value_count
    }

    pub fn has_changes(&self) -> bool {
        self.is_valid && self.attribute_set.is_some() && self.old_id != self.new_id
    }

    pub fn summary(&self) -> String {
        if let Some(message) = &self.error_message {
            return format!(
                "Rename attribute set '{}' to '{}' (blocked: {message})",
                self.old_id, self.new_id
            );
        }
        match &self.attribute_set {
            None => format!(
                "Rename attribute set '{}' to '{}': nothing to change, no such set",
                self.old_id, self.new_id
            ),
            Some(_) if self.old_id == self.new_id => "No changes requested".to_string(),
            Some(_) => format!(
                "Rename attribute set '{}' to '{}': {} value(s) repointed",
                self.old_id, self.new_id, self.affected_value_count
            ),
        }
    }
}
