//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the employee record store contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must validate the full record before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to store failures.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod employee_repo;
pub mod memory_repo;

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch read as `0`; callers combine this with the
/// previous timestamp so stored values never decrease.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
