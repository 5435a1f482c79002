//! Derived list views over an employee collection.
//!
//! # Responsibility
//! - Sort, search and department-filter employee snapshots.
//! - Model the table header sort toggle.
//!
//! # Invariants
//! - All functions are pure and never reorder records with equal keys.

pub mod view;
