//! Identity change engine.
//!
//! [`PreviewBuilder`] computes what a rename would touch without writing;
//! [`ChangeExecutor`] applies a preview, or a cascade delete, inside a single
//! transaction. Both sit on top of [`crate::repositories::DependencyRepo`].

pub mod executor;
pub mod preview;

pub use executor::{ChangeExecutor, ChangeOutcome, DeleteOutcome};
pub use preview::PreviewBuilder;
