//! Domain model for employee performance tracking.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field-level validation of employee payloads.
//!
//! # Invariants
//! - Every employee is identified by a stable `EmployeeId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod employee;
pub mod seed;
