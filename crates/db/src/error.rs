//! Errors raised by the change executor.
//!
//! Every error carries the [`Operation`] that was in progress, and is only
//! returned after the operation's transaction has been rolled back.

use std::fmt;

use attrdb_core::change::{ChangeKind, ChangeRequest};

/// The high-level mutation in progress when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    RenameCategory { from: String, to: String },
    RenameAttribute { from: String, to: String },
    RenameAttributeSet { from: String, to: String },
    DeleteCategory(String),
    DeleteAttribute(String),
    DeleteAttributeSet(String),
}

impl Operation {
    /// The rename operation a request describes, `None` for a no-op.
    pub fn for_request(request: &ChangeRequest) -> Option<Self> {
        match request.kind() {
            ChangeKind::NoOp => None,
            ChangeKind::CategoryRename => Some(Self::RenameCategory {
                from: request.old_category.clone(),
                to: request.new_category.clone(),
            }),
            ChangeKind::AttributeRename => Some(Self::RenameAttribute {
                from: request.old_id.clone(),
                to: request.new_id.clone(),
            }),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameCategory { from, to } => write!(f, "renaming category {from} to {to}"),
            Self::RenameAttribute { from, to } => write!(f, "renaming attribute {from} to {to}"),
            Self::RenameAttributeSet { from, to } => {
                write!(f, "renaming attribute set {from} to {to}")
            }
            Self::DeleteCategory(category) => write!(f, "deleting category {category}"),
            Self::DeleteAttribute(id) => write!(f, "deleting attribute {id}"),
            Self::DeleteAttributeSet(id) => write!(f, "deleting attribute set {id}"),
        }
    }
}

/// Failure of a mutating engine operation.
///
/// Every variant is returned only after the transaction has been rolled back.
/// Callers must not retry automatically; a rename has to be previewed again.
#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    /// A statement failed mid-cascade (constraint violation, I/O, ...).
    #[error("Database error while {operation}: {source}")]
    Database {
        operation: Operation,
        #[source]
        source: sqlx::Error,
    },

    /// The data changed between preview and apply.
    #[error("Stale preview while {operation}: {reason}; refresh and preview the change again")]
    Stale { operation: Operation, reason: String },
}

impl ChangeError {
    pub fn database(operation: &Operation, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.clone(),
            source,
        }
    }

    pub fn stale(operation: &Operation, reason: impl Into<String>) -> Self {
        Self::Stale {
            operation: operation.clone(),
            reason: reason.into(),
        }
    }

    pub fn operation(&self) -> &Operation {
        match self {
            Self::Database { operation, .. } | Self::Stale { operation, .. } => operation,
        }
    }
}
