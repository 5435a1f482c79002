//! Employee domain model and record validation.
//!
//! # Responsibility
//! - Define the canonical employee record and its write payloads.
//! - Validate candidate payloads into normalized field sets.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another employee.
//! - `performance_score` is within `0..=100`; `tasks_completed` is within
//!   `0..=MAX_TASKS_COMPLETED`.
//! - `last_updated` is owned by the store and never client-supplied.
//! - Validation reports every violation, never only the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one employee record.
pub type EmployeeId = Uuid;

/// Inclusive upper bound of `performance_score`.
pub const MAX_PERFORMANCE_SCORE: u8 = 100;

/// Inclusive upper bound of `tasks_completed`, the range of its `u32` storage.
pub const MAX_TASKS_COMPLETED: u32 = u32::MAX;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$")
        .expect("valid email regex")
});

/// Canonical persisted employee record.
///
/// Serialized with the external camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub performance_score: u8,
    pub tasks_completed: u32,
    /// Unix epoch milliseconds of the latest create/update.
    pub last_updated: i64,
}

impl Employee {
    /// Assembles a record from validated fields and store-assigned metadata.
    pub fn from_fields(id: EmployeeId, fields: EmployeeFields, last_updated: i64) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            position: fields.position,
            department: fields.department,
            performance_score: fields.performance_score,
            tasks_completed: fields.tasks_completed,
            last_updated,
        }
    }

    /// Returns the client-owned part of this record.
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            name: self.name.clone(),
            email: self.email.clone(),
            position: self.position.clone(),
            department: self.department.clone(),
            performance_score: self.performance_score,
            tasks_completed: self.tasks_completed,
        }
    }
}

/// Validated and normalized employee fields, without store metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub performance_score: u8,
    pub tasks_completed: u32,
}

impl EmployeeFields {
    /// Converts back into an input payload with every field present.
    pub fn to_input(&self) -> EmployeeInput {
        EmployeeInput {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            position: Some(self.position.clone()),
            department: Some(self.department.clone()),
            performance_score: Some(i64::from(self.performance_score)),
            tasks_completed: Some(i64::from(self.tasks_completed)),
        }
    }
}

/// Candidate payload for create, and partial payload for update.
///
/// Numbers are kept wide and signed so out-of-range values reach the
/// validator instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub performance_score: Option<i64>,
    pub tasks_completed: Option<i64>,
}

impl EmployeeInput {
    /// Returns a copy of `self` with every field supplied by `patch` replaced.
    pub fn overlay(&self, patch: &EmployeeInput) -> EmployeeInput {
        EmployeeInput {
            name: patch.name.clone().or_else(|| self.name.clone()),
            email: patch.email.clone().or_else(|| self.email.clone()),
            position: patch.position.clone().or_else(|| self.position.clone()),
            department: patch.department.clone().or_else(|| self.department.clone()),
            performance_score: patch.performance_score.or(self.performance_score),
            tasks_completed: patch.tasks_completed.or(self.tasks_completed),
        }
    }

    /// Returns whether no field is supplied.
    pub fn is_empty(&self) -> bool {
        *self == EmployeeInput::default()
    }
}

/// Client-owned employee field, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmployeeField {
    Name,
    Email,
    Position,
    Department,
    PerformanceScore,
    TasksCompleted,
}

impl EmployeeField {
    /// External (camelCase) field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Position => "position",
            Self::Department => "department",
            Self::PerformanceScore => "performanceScore",
            Self::TasksCompleted => "tasksCompleted",
        }
    }
}

impl Display for EmployeeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: EmployeeField,
    pub reason: String,
}

impl FieldViolation {
    fn new(field: EmployeeField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// All field violations found in one candidate payload. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeValidationError {
    pub violations: Vec<FieldViolation>,
}

impl EmployeeValidationError {
    /// Returns whether `field` has at least one violation.
    pub fn has_violation(&self, field: EmployeeField) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.field == field)
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "employee validation failed: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.reason)?;
        }
        Ok(())
    }
}

impl Error for EmployeeValidationError {}

/// Validates a candidate payload and returns normalized fields.
///
/// Text fields are trimmed. Email uniqueness is a store constraint and is
/// not checked here.
///
/// # Errors
/// - Returns every violated field constraint in field declaration order.
pub fn validate(candidate: &EmployeeInput) -> Result<EmployeeFields, EmployeeValidationError> {
    let mut violations = Vec::new();

    let name = required_text(
        candidate.name.as_deref(),
        EmployeeField::Name,
        "Please add a name",
        &mut violations,
    );
    let email = required_text(
        candidate.email.as_deref(),
        EmployeeField::Email,
        "Please add an email",
        &mut violations,
    );
    if let Some(value) = email.as_deref() {
        if !is_valid_email(value) {
            violations.push(FieldViolation::new(
                EmployeeField::Email,
                "Please add a valid email",
            ));
        }
    }
    let position = required_text(
        candidate.position.as_deref(),
        EmployeeField::Position,
        "Please add a position",
        &mut violations,
    );
    let department = required_text(
        candidate.department.as_deref(),
        EmployeeField::Department,
        "Please add a department",
        &mut violations,
    );

    let performance_score = match candidate.performance_score {
        None => {
            violations.push(FieldViolation::new(
                EmployeeField::PerformanceScore,
                "Please add a performance score",
            ));
            None
        }
        Some(value) => match u8::try_from(value) {
            Ok(score) if score <= MAX_PERFORMANCE_SCORE => Some(score),
            _ => {
                violations.push(FieldViolation::new(
                    EmployeeField::PerformanceScore,
                    format!("performance score must be between 0 and 100, got {value}"),
                ));
                None
            }
        },
    };

    let tasks_completed = match candidate.tasks_completed {
        None => {
            violations.push(FieldViolation::new(
                EmployeeField::TasksCompleted,
                "Please add the number of tasks completed",
            ));
            None
        }
        Some(value) if value < 0 => {
            violations.push(FieldViolation::new(
                EmployeeField::TasksCompleted,
                format!("tasks completed must be >= 0, got {value}"),
            ));
            None
        }
        Some(value) => match u32::try_from(value) {
            Ok(tasks) => Some(tasks),
            Err(_) => {
                violations.push(FieldViolation::new(
                    EmployeeField::TasksCompleted,
                    format!(
                        "tasks completed must be at most {MAX_TASKS_COMPLETED}, got {value}"
                    ),
                ));
                None
            }
        },
    };

    match (
        name,
        email,
        position,
        department,
        performance_score,
        tasks_completed,
    ) {
        (
            Some(name),
            Some(email),
            Some(position),
            Some(department),
            Some(performance_score),
            Some(tasks_completed),
        ) if violations.is_empty() => Ok(EmployeeFields {
            name,
            email,
            position,
            department,
            performance_score,
            tasks_completed,
        }),
        _ => Err(EmployeeValidationError { violations }),
    }
}

/// Returns whether `value` matches the accepted email address pattern.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn required_text(
    value: Option<&str>,
    field: EmployeeField,
    missing_reason: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Some(trimmed.to_string()),
        _ => {
            violations.push(FieldViolation::new(field, missing_reason));
            None
        }
    }
}
