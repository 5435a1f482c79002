//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `employees` storage.
//! - Keep SQL details inside core persistence boundary.
//! - Translate storage constraint failures into semantic errors.
//!
//! # Invariants
//! - Write paths validate the complete record before SQL mutations.
//! - Email uniqueness is enforced by the `idx_employees_email` unique index,
//!   never by a separate existence query.
//! - Update reads, merges and writes inside one IMMEDIATE transaction.
//! - `updated_at` never moves backwards for a given record.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{
    validate, Employee, EmployeeFields, EmployeeId, EmployeeInput, EmployeeValidationError,
};
use crate::query::view::{SortDirection, SortField, SortState};
use crate::repo::now_epoch_ms;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email,
    position,
    department,
    performance_score,
    tasks_completed,
    updated_at
FROM employees";

const REQUIRED_COLUMNS: &[&str] = &[
    "uuid",
    "name",
    "email",
    "position",
    "department",
    "performance_score",
    "tasks_completed",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Candidate or merged record violates field constraints.
    Validation(EmployeeValidationError),
    /// Identifier does not resolve to a record.
    NotFound(String),
    /// Another record already uses this email.
    Conflict { email: String },
    /// Underlying store failed or is unreachable.
    StoreUnavailable(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Stable machine-readable code, used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Conflict { .. } => "email_conflict",
            Self::StoreUnavailable(err) => err.code(),
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Conflict { email } => write!(f, "email already exists: {email}"),
            Self::StoreUnavailable(err) => write!(f, "employee store unavailable: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "employee repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "employee repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Conflict { .. } => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::StoreUnavailable(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StoreUnavailable(DbError::Sqlite(value))
    }
}

/// Query options for listing employees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListQuery {
    /// `None` lists most recently updated first.
    pub sort: Option<SortState>,
}

impl EmployeeListQuery {
    pub fn sorted(field: SortField, direction: SortDirection) -> Self {
        Self {
            sort: Some(SortState::new(field, direction)),
        }
    }
}

/// Repository interface for employee CRUD operations.
///
/// Implementations own the canonical collection and must make every
/// mutation appear atomic to concurrent readers.
pub trait EmployeeRepository {
    /// Lists all employees in the requested order.
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>>;
    /// Gets one employee by id.
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Inserts a new employee with a fresh id and `last_updated = now`.
    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee>;
    /// Merges `patch` over an existing employee, revalidates the whole
    /// record and refreshes `last_updated`.
    fn update_employee(&self, id: EmployeeId, patch: &EmployeeInput) -> RepoResult<Employee>;
    /// Hard-deletes one employee.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for &R {
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>> {
        (**self).list_employees(query)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        (**self).get_employee(id)
    }

    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee> {
        (**self).create_employee(fields)
    }

    fn update_employee(&self, id: EmployeeId, patch: &EmployeeInput) -> RepoResult<Employee> {
        (**self).update_employee(id, patch)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        (**self).delete_employee(id)
    }
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for Arc<R> {
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>> {
        (**self).list_employees(query)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        (**self).get_employee(id)
    }

    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee> {
        (**self).create_employee(fields)
    }

    fn update_employee(&self, id: EmployeeId, patch: &EmployeeInput) -> RepoResult<Employee> {
        (**self).update_employee(id, patch)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        (**self).delete_employee(id)
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>> {
        let mut sql = format!("{EMPLOYEE_SELECT_SQL} ORDER BY ");
        if let Some(state) = query.sort {
            sql.push_str(&format!(
                "{} {}, ",
                sort_column(state.field),
                direction_keyword(state.direction)
            ));
        }
        sql.push_str("updated_at DESC, rowid DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        load_employee(self.conn, id)
    }

    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee> {
        let fields = validate(&fields.to_input())?;
        let id = Uuid::new_v4();
        let now = now_epoch_ms();

        self.conn
            .execute(
                "INSERT INTO employees (
                    uuid,
                    name,
                    email,
                    position,
                    department,
                    performance_score,
                    tasks_completed,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8);",
                params![
                    id.to_string(),
                    fields.name.as_str(),
                    fields.email.as_str(),
                    fields.position.as_str(),
                    fields.department.as_str(),
                    i64::from(fields.performance_score),
                    i64::from(fields.tasks_completed),
                    now,
                ],
            )
            .map_err(|err| map_write_error(err, &fields.email))?;

        Ok(Employee::from_fields(id, fields, now))
    }

    fn update_employee(&self, id: EmployeeId, patch: &EmployeeInput) -> RepoResult<Employee> {
        // IMMEDIATE takes the write lock up front, so no other writer can
        // slip between the read and the update below.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let existing =
            load_employee(&tx, id)?.ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        let fields = validate(&existing.fields().to_input().overlay(patch))?;
        let last_updated = now_epoch_ms().max(existing.last_updated);

        tx.execute(
            "UPDATE employees
             SET
                name = ?2,
                email = ?3,
                position = ?4,
                department = ?5,
                performance_score = ?6,
                tasks_completed = ?7,
                updated_at = ?8
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                fields.name.as_str(),
                fields.email.as_str(),
                fields.position.as_str(),
                fields.department.as_str(),
                i64::from(fields.performance_score),
                i64::from(fields.tasks_completed),
                last_updated,
            ],
        )
        .map_err(|err| map_write_error(err, &fields.email))?;
        tx.commit()?;

        Ok(Employee::from_fields(id, fields, last_updated))
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn load_employee(conn: &Connection, id: EmployeeId) -> RepoResult<Option<Employee>> {
    let mut stmt = conn.prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_employee_row(row)?));
    }

    Ok(None)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in employees.uuid"))
    })?;

    let score: i64 = row.get("performance_score")?;
    let performance_score = u8::try_from(score).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid score `{score}` in employees.performance_score for {id}"
        ))
    })?;

    let tasks: i64 = row.get("tasks_completed")?;
    let tasks_completed = u32::try_from(tasks).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid task count `{tasks}` in employees.tasks_completed for {id}"
        ))
    })?;

    let stored = EmployeeFields {
        name: row.get("name")?,
        email: row.get("email")?,
        position: row.get("position")?,
        department: row.get("department")?,
        performance_score,
        tasks_completed,
    };
    let fields = validate(&stored.to_input())
        .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;

    Ok(Employee::from_fields(id, fields, row.get("updated_at")?))
}

fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    if is_email_conflict(&err) {
        return RepoError::Conflict {
            email: email.to_string(),
        };
    }

    err.into()
}

fn is_email_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message
                    .as_deref()
                    .is_some_and(|text| text.contains("employees.email"))
        }
        _ => false,
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Name => "name",
        SortField::Email => "email",
        SortField::Position => "position",
        SortField::Department => "department",
        SortField::PerformanceScore => "performance_score",
        SortField::TasksCompleted => "tasks_completed",
        SortField::LastUpdated => "updated_at",
    }
}

fn direction_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    }
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "employees")? {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "employees", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
