//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the operations exposed to the transport layer.
//! - Resolve opaque string ids and validate payloads before persistence.
//! - Build dashboard, statistics and table views from store snapshots.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Store errors propagate unchanged; nothing is swallowed.
//! - Log events carry ids and error codes only, never names or emails.

use crate::model::employee::{validate, Employee, EmployeeFields, EmployeeId, EmployeeInput};
use crate::query::view::{apply_view, departments, SortState, ViewQuery};
use crate::repo::employee_repo::{EmployeeListQuery, EmployeeRepository, RepoError, RepoResult};
use crate::stats::aggregate::{
    dashboard_summary, performance_stats, DashboardSummary, PerformanceStats,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::fmt::Hyphenated;
use uuid::Uuid;

/// Default length of the dashboard recent activity list.
pub const DASHBOARD_RECENT_LIMIT: usize = 5;
/// Default length of the top performers list.
pub const TOP_PERFORMERS_LIMIT: usize = 5;

/// Table page payload: the derived rows plus department filter choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub employees: Vec<Employee>,
    /// Computed from the unfiltered collection.
    pub departments: Vec<String>,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: usize,
    /// Rows skipped because their email already exists.
    pub skipped: usize,
}

/// Use-case service wrapper for employee operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists employees; `None` means most recently updated first.
    pub fn list_employees(&self, sort: Option<SortState>) -> RepoResult<Vec<Employee>> {
        self.repo.list_employees(&EmployeeListQuery { sort })
    }

    /// Gets one employee by opaque id.
    ///
    /// An id that cannot be parsed cannot resolve and yields `NotFound`.
    pub fn get_employee(&self, id: &str) -> RepoResult<Employee> {
        let employee_id = parse_employee_id(id)?;
        self.repo
            .get_employee(employee_id)?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    /// Validates `input` and creates a new employee.
    ///
    /// # Errors
    /// - `Validation` with every violated field.
    /// - `Conflict` when the email is already used.
    pub fn create_employee(&self, input: &EmployeeInput) -> RepoResult<Employee> {
        let started_at = Instant::now();
        let result = validate(input)
            .map_err(RepoError::from)
            .and_then(|fields| self.repo.create_employee(&fields));
        log_write("employee_create", started_at, &result, |employee| employee.id);
        result
    }

    /// Merges `patch` over an existing employee.
    ///
    /// The merged record is validated as a whole, not only touched fields.
    pub fn update_employee(&self, id: &str, patch: &EmployeeInput) -> RepoResult<Employee> {
        let started_at = Instant::now();
        let result =
            parse_employee_id(id).and_then(|employee_id| self.repo.update_employee(employee_id, patch));
        log_write("employee_update", started_at, &result, |employee| employee.id);
        result
    }

    /// Deletes one employee by opaque id.
    pub fn delete_employee(&self, id: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = parse_employee_id(id).and_then(|employee_id| {
            self.repo.delete_employee(employee_id)?;
            Ok(employee_id)
        });
        log_write("employee_delete", started_at, &result, |id| *id);
        result.map(|_| ())
    }

    /// Creates each row, skipping rows whose email already exists.
    ///
    /// Stops at the first error other than `Conflict`.
    pub fn import_employees(&self, rows: &[EmployeeFields]) -> RepoResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for row in rows {
            match self.repo.create_employee(row) {
                Ok(_) => summary.created += 1,
                Err(RepoError::Conflict { .. }) => summary.skipped += 1,
                Err(err) => return Err(err),
            }
        }
        info!(
            "event=employee_import module=service status=ok created={} skipped={}",
            summary.created, summary.skipped
        );
        Ok(summary)
    }

    /// Dashboard figures over the default-ordered collection.
    pub fn dashboard(&self, recent: usize) -> RepoResult<DashboardSummary> {
        let employees = self.list_employees(None)?;
        Ok(dashboard_summary(&employees, recent))
    }

    /// Department breakdown and top `top` performers.
    pub fn performance_stats(&self, top: usize) -> RepoResult<PerformanceStats> {
        let employees = self.list_employees(None)?;
        Ok(performance_stats(&employees, top))
    }

    /// Applies a table view query over the default-ordered collection.
    pub fn table_view(&self, query: &ViewQuery) -> RepoResult<TableView> {
        let employees = self.list_employees(None)?;
        Ok(TableView {
            departments: departments(&employees),
            employees: apply_view(&employees, query),
        })
    }
}

/// Parses an opaque id string; anything else maps to `NotFound`.
///
/// Only the hyphenated form that records serialize with is accepted, as is;
/// the error echoes `id` exactly.
pub fn parse_employee_id(id: &str) -> RepoResult<EmployeeId> {
    if id.len() != Hyphenated::LENGTH {
        return Err(RepoError::NotFound(id.to_string()));
    }
    Uuid::parse_str(id).map_err(|_| RepoError::NotFound(id.to_string()))
}

fn log_write<T>(
    event: &str,
    started_at: Instant,
    result: &RepoResult<T>,
    employee_id: impl Fn(&T) -> EmployeeId,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => info!(
            "event={event} module=service status=ok duration_ms={duration_ms} employee_id={}",
            employee_id(value)
        ),
        Err(err) => warn!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
}
