pub mod change;
pub mod error;
pub mod identity;
pub mod types;
pub mod values;
