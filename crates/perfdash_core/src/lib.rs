//! Core domain logic for the employee performance dashboard.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod stats;

pub use logging::{
    default_log_level, init_logging, logging_status, LogConfig, LoggingError,
};
pub use model::employee::{
    is_valid_email, validate, Employee, EmployeeField, EmployeeFields, EmployeeId, EmployeeInput,
    EmployeeValidationError, FieldViolation, MAX_PERFORMANCE_SCORE, MAX_TASKS_COMPLETED,
};
pub use model::seed::seed_employees;
pub use query::view::{
    apply_view, departments, filter_by_category, filter_by_text, request_sort, sort_by,
    SortDirection, SortField, SortState, ViewQuery, ALL_DEPARTMENTS,
};
pub use repo::employee_repo::{
    EmployeeListQuery, EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use repo::memory_repo::InMemoryEmployeeRepository;
pub use service::employee_service::{
    parse_employee_id, EmployeeService, ImportSummary, TableView, DASHBOARD_RECENT_LIMIT,
    TOP_PERFORMERS_LIMIT,
};
pub use stats::aggregate::{
    average_score, by_department, dashboard_summary, performance_stats, score_histogram,
    top_n, top_performer, total_count, total_tasks, BucketCount, DashboardSummary,
    DepartmentStats, PerformanceStats, ScoreBucket,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
