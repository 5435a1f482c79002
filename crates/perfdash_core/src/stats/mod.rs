//! Aggregate performance metrics.
//!
//! # Responsibility
//! - Compute dashboard and statistics-page figures from a snapshot.
//!
//! # Invariants
//! - Every metric is recomputed on demand; nothing is cached.
//! - Empty collections are a defined case, never an error.

pub mod aggregate;
