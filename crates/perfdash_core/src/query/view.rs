//! Sort, search and filter engine for the employee table.
//!
//! # Responsibility
//! - Produce derived views from a borrowed employee snapshot.
//! - Keep the application order fixed: sort, then text search, then
//!   department filter.
//!
//! # Invariants
//! - Sorting is stable in both directions; equal keys keep input order.
//! - An empty search term and the `all` department sentinel are identities.

use crate::model::employee::Employee;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Sentinel department value that disables department filtering.
pub const ALL_DEPARTMENTS: &str = "all";

/// Sortable employee column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Email,
    Position,
    Department,
    PerformanceScore,
    TasksCompleted,
    LastUpdated,
}

impl SortField {
    /// External (camelCase) column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Position => "position",
            Self::Department => "department",
            Self::PerformanceScore => "performanceScore",
            Self::TasksCompleted => "tasksCompleted",
            Self::LastUpdated => "lastUpdated",
        }
    }

    /// Parses a column name in camelCase or snake_case form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "position" => Some(Self::Position),
            "department" => Some(Self::Department),
            "performanceScore" | "performance_score" => Some(Self::PerformanceScore),
            "tasksCompleted" | "tasks_completed" => Some(Self::TasksCompleted),
            "lastUpdated" | "last_updated" => Some(Self::LastUpdated),
            _ => None,
        }
    }

    /// Compares two records by this column's natural ordering.
    ///
    /// Text compares lexicographically, numbers numerically.
    pub fn compare(self, left: &Employee, right: &Employee) -> Ordering {
        match self {
            Self::Name => left.name.cmp(&right.name),
            Self::Email => left.email.cmp(&right.email),
            Self::Position => left.position.cmp(&right.position),
            Self::Department => left.department.cmp(&right.department),
            Self::PerformanceScore => left.performance_score.cmp(&right.performance_score),
            Self::TasksCompleted => left.tasks_completed.cmp(&right.tasks_completed),
            Self::LastUpdated => left.last_updated.cmp(&right.last_updated),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Active table sort: one column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Computes the next sort after a header click on `field`.
///
/// Clicking the active ascending column flips it to descending; every other
/// click sorts `field` ascending.
pub fn request_sort(current: Option<SortState>, field: SortField) -> SortState {
    match current {
        Some(state) if state.field == field && state.direction == SortDirection::Ascending => {
            SortState::new(field, SortDirection::Descending)
        }
        _ => SortState::new(field, SortDirection::Ascending),
    }
}

/// Returns `records` stably sorted by `field` in `direction`.
pub fn sort_by(records: &[Employee], field: SortField, direction: SortDirection) -> Vec<Employee> {
    let mut sorted = records.to_vec();
    match direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| field.compare(a, b)),
        SortDirection::Descending => sorted.sort_by(|a, b| field.compare(b, a)),
    }
    sorted
}

/// Keeps records whose name or email contains `term`, ignoring case.
///
/// An empty term keeps every record.
pub fn filter_by_text(records: &[Employee], term: &str) -> Vec<Employee> {
    if term.is_empty() {
        return records.to_vec();
    }

    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|employee| {
            employee.name.to_lowercase().contains(&needle)
                || employee.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Keeps records whose department equals `department` exactly.
///
/// [`ALL_DEPARTMENTS`] keeps every record.
pub fn filter_by_category(records: &[Employee], department: &str) -> Vec<Employee> {
    if department == ALL_DEPARTMENTS {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|employee| employee.department == department)
        .cloned()
        .collect()
}

/// Returns the department filter choices: [`ALL_DEPARTMENTS`] followed by
/// each distinct department in first-appearance order.
pub fn departments(records: &[Employee]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut choices = vec![ALL_DEPARTMENTS.to_string()];
    for employee in records {
        if seen.insert(employee.department.as_str()) {
            choices.push(employee.department.clone());
        }
    }
    choices
}

/// Table view parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// `None` keeps the input order.
    pub sort: Option<SortState>,
    pub search: String,
    pub department: String,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            sort: None,
            search: String::new(),
            department: ALL_DEPARTMENTS.to_string(),
        }
    }
}

/// Applies sort, text search and department filter, in that order.
pub fn apply_view(records: &[Employee], query: &ViewQuery) -> Vec<Employee> {
    let sorted = match query.sort {
        Some(state) => sort_by(records, state.field, state.direction),
        None => records.to_vec(),
    };
    let searched = filter_by_text(&sorted, &query.search);
    filter_by_category(&searched, &query.department)
}
