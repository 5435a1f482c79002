use perfdash_core::db::open_db_in_memory;
use perfdash_core::{
    parse_employee_id, seed_employees, EmployeeField, EmployeeInput, EmployeeService, RepoError,
    SortDirection, SortField, SortState, SqliteEmployeeRepository, ViewQuery,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> EmployeeService<SqliteEmployeeRepository<'_>> {
    EmployeeService::new(SqliteEmployeeRepository::try_new(conn).unwrap())
}

fn seeded_service(conn: &Connection) -> EmployeeService<SqliteEmployeeRepository<'_>> {
    let service = service(conn);
    let summary = service.import_employees(&seed_employees()).unwrap();
    assert_eq!(summary.created, 8);
    service
}

fn input(name: &str, email: &str, score: i64) -> EmployeeInput {
    EmployeeInput {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        position: Some("Analyst".to_string()),
        department: Some("Finance".to_string()),
        performance_score: Some(score),
        tasks_completed: Some(12),
    }
}

#[test]
fn unknown_id_string_is_not_found_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded_service(&conn);
    let before = service.list_employees(None).unwrap();

    let patch = EmployeeInput {
        name: Some("X".to_string()),
        ..EmployeeInput::default()
    };
    let err = service.update_employee("999", &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref id) if id == "999"));
    assert!(matches!(
        service.get_employee("999"),
        Err(RepoError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_employee("999"),
        Err(RepoError::NotFound(_))
    ));

    assert_eq!(service.list_employees(None).unwrap(), before);
}

#[test]
fn only_canonical_hyphenated_ids_resolve() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service
        .create_employee(&input("Grace Hopper", "grace.h@example.com", 97))
        .unwrap();
    let canonical = created.id.to_string();
    assert_eq!(service.get_employee(&canonical).unwrap(), created);

    let variants = [
        format!(" {canonical} "),
        format!("{{{canonical}}}"),
        format!("urn:uuid:{canonical}"),
        created.id.simple().to_string(),
    ];
    for variant in &variants {
        match service.get_employee(variant) {
            Err(RepoError::NotFound(echoed)) => assert_eq!(&echoed, variant),
            other => panic!("expected not found for `{variant}`, got {other:?}"),
        }
        assert!(matches!(
            parse_employee_id(variant),
            Err(RepoError::NotFound(ref echoed)) if echoed == variant
        ));
    }
}

#[test]
fn create_rejects_invalid_payload_with_every_violation() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let payload = EmployeeInput {
        name: Some("   ".to_string()),
        email: Some("not-an-email".to_string()),
        performance_score: Some(150),
        tasks_completed: Some(-1),
        ..EmployeeInput::default()
    };
    let validation = match service.create_employee(&payload) {
        Err(RepoError::Validation(validation)) => validation,
        other => panic!("expected validation error, got {other:?}"),
    };
    for field in [
        EmployeeField::Name,
        EmployeeField::Email,
        EmployeeField::Position,
        EmployeeField::Department,
        EmployeeField::PerformanceScore,
        EmployeeField::TasksCompleted,
    ] {
        assert!(validation.has_violation(field), "missing violation for {field}");
    }
    assert!(service.list_employees(None).unwrap().is_empty());
}

#[test]
fn create_trims_text_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .create_employee(&input("  Grace Hopper ", " grace.h@example.com ", 97))
        .unwrap();
    assert_eq!(created.name, "Grace Hopper");
    assert_eq!(created.email, "grace.h@example.com");

    let loaded = service.get_employee(&created.id.to_string()).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn duplicate_email_is_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded_service(&conn);

    let err = service
        .create_employee(&input("Alice Again", "alice.j@example.com", 70))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { ref email } if email == "alice.j@example.com"));
    assert_eq!(service.list_employees(None).unwrap().len(), 8);
}

#[test]
fn update_and_delete_through_string_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service
        .create_employee(&input("Grace Hopper", "grace.h@example.com", 97))
        .unwrap();
    let id = created.id.to_string();

    let patch = EmployeeInput {
        performance_score: Some(99),
        ..EmployeeInput::default()
    };
    let updated = service.update_employee(&id, &patch).unwrap();
    assert_eq!(updated.performance_score, 99);
    assert_eq!(updated.name, created.name);
    assert!(updated.last_updated >= created.last_updated);

    service.delete_employee(&id).unwrap();
    assert!(matches!(
        service.get_employee(&id),
        Err(RepoError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_employee(&id),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn import_skips_existing_emails() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded_service(&conn);

    let summary = service.import_employees(&seed_employees()).unwrap();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 8);
    assert_eq!(service.list_employees(None).unwrap().len(), 8);
}

#[test]
fn dashboard_over_seeded_store() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded_service(&conn);

    let dashboard = service.dashboard(5).unwrap();
    assert_eq!(dashboard.total_employees, 8);
    assert_eq!(dashboard.total_tasks, 815);
    assert_eq!(dashboard.average_score, 89.9);
    assert_eq!(
        dashboard.top_performer.as_ref().unwrap().email,
        "hannah.m@example.com"
    );
    assert_eq!(dashboard.recent.len(), 5);
    let counts: Vec<_> = dashboard.histogram.iter().map(|entry| entry.count).collect();
    assert_eq!(counts, vec![5, 3, 0, 0]);
}

#[test]
fn performance_stats_over_seeded_store() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded_service(&conn);

    let stats = service.performance_stats(3).unwrap();
    let scores: Vec<_> = stats
        .top_performers
        .iter()
        .map(|employee| employee.performance_score)
        .collect();
    assert_eq!(scores, vec![96, 95, 92]);

    let engineering = stats
        .departments
        .iter()
        .find(|group| group.department == "Engineering")
        .unwrap();
    assert_eq!(engineering.count, 4);
    assert_eq!(engineering.total_tasks, 580);
    assert_eq!(engineering.average_score, 89.0);
    assert_eq!(stats.departments.len(), 5);
}

#[test]
fn table_view_filters_rows_but_keeps_all_department_choices() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded_service(&conn);

    let query = ViewQuery {
        sort: Some(SortState::new(SortField::Name, SortDirection::Ascending)),
        search: "E".to_string(),
        department: "Engineering".to_string(),
    };
    let view = service.table_view(&query).unwrap();

    let names: Vec<_> = view.employees.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Alice Johnson", "Bob Smith", "Ethan Hunt", "Fiona Glenanne"]
    );
    assert_eq!(view.departments.len(), 6);
    assert_eq!(view.departments[0], "all");
}
