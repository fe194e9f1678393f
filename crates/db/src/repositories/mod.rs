//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. CRUD
//! repositories accept `&SqlitePool`; [`DependencyRepo`] accepts a
//! connection so it can also run inside an open transaction.

pub mod attribute_repo;
pub mod attribute_set_repo;
pub mod attribute_value_repo;
pub mod dependency_repo;
pub mod summary_repo;

pub use attribute_repo::AttributeRepo;
pub use attribute_set_repo::AttributeSetRepo;
pub use attribute_value_repo::AttributeValueRepo;
pub use dependency_repo::DependencyRepo;
pub use summary_repo::SummaryRepo;
