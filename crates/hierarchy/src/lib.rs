//! Org-chart construction from flat employee records.
//!
//! This crate provides the pure, in-memory side of the employee directory:
//! - Forest construction from manager references
//! - Pre-order flattening for search mode
//! - Case-insensitive query filtering
//! - Manager assignment checks for the mutation boundary

pub mod error;
pub mod flatten;
pub mod forest;
pub mod query;
pub mod record;
pub mod validate;

#[cfg(test)]
mod tests;

// Re-export main types
pub use error::{HierarchyError, Result};
pub use flatten::{flatten, PreOrder};
pub use forest::{build_forest, EmployeeNode, Forest};
pub use query::filter_by_query;
pub use record::EmployeeRecord;
pub use validate::validate_manager;
