//! In-process employee repository.
//!
//! # Responsibility
//! - Provide a storage-free `EmployeeRepository` for tests, demos and
//!   embedding callers that do not need durability.
//!
//! # Invariants
//! - The collection lives in one explicit instance; there is no global.
//! - Every mutation checks uniqueness and writes under a single write guard.
//! - Records are kept newest-insert first.

use crate::model::employee::{validate, Employee, EmployeeFields, EmployeeId, EmployeeInput};
use crate::query::view::sort_by;
use crate::repo::employee_repo::{EmployeeListQuery, EmployeeRepository, RepoError, RepoResult};
use crate::repo::now_epoch_ms;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// `RwLock`-guarded employee collection.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    records: RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Writers build the replacement record before touching the collection,
    // so state behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Employee>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Employee>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>> {
        let mut employees = self.read().clone();
        // Stable: equal timestamps keep newest-insert-first order.
        employees.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

        Ok(match query.sort {
            Some(state) => sort_by(&employees, state.field, state.direction),
            None => employees,
        })
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        Ok(self.read().iter().find(|employee| employee.id == id).cloned())
    }

    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee> {
        let fields = validate(&fields.to_input())?;

        let mut records = self.write();
        if records.iter().any(|employee| employee.email == fields.email) {
            return Err(RepoError::Conflict {
                email: fields.email,
            });
        }

        let employee = Employee::from_fields(Uuid::new_v4(), fields, now_epoch_ms());
        records.insert(0, employee.clone());
        Ok(employee)
    }

    fn update_employee(&self, id: EmployeeId, patch: &EmployeeInput) -> RepoResult<Employee> {
        let mut records = self.write();

        let index = records
            .iter()
            .position(|employee| employee.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        let existing = &records[index];

        let fields = validate(&existing.fields().to_input().overlay(patch))?;
        let last_updated = now_epoch_ms().max(existing.last_updated);

        if records
            .iter()
            .any(|employee| employee.id != id && employee.email == fields.email)
        {
            return Err(RepoError::Conflict {
                email: fields.email,
            });
        }

        let updated = Employee::from_fields(id, fields, last_updated);
        records[index] = updated.clone();
        Ok(updated)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let mut records = self.write();
        let before = records.len();
        records.retain(|employee| employee.id != id);

        if records.len() == before {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
