use perfdash_core::{
    seed_employees, EmployeeInput, EmployeeListQuery, EmployeeRepository, EmployeeService,
    InMemoryEmployeeRepository, RepoError, SortDirection, SortField,
};
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

fn seeded() -> InMemoryEmployeeRepository {
    let repo = InMemoryEmployeeRepository::new();
    for row in seed_employees() {
        repo.create_employee(&row).unwrap();
    }
    repo
}

#[test]
fn create_and_get_roundtrip() {
    let repo = InMemoryEmployeeRepository::new();
    let fields = seed_employees()[2].clone();

    let created = repo.create_employee(&fields).unwrap();
    assert_eq!(created.fields(), fields);
    assert_eq!(repo.get_employee(created.id).unwrap(), Some(created));
}

#[test]
fn duplicate_email_conflicts_and_leaves_collection_unchanged() {
    let repo = seeded();
    let before = repo.list_employees(&EmployeeListQuery::default()).unwrap();

    let mut duplicate = seed_employees()[4].clone();
    duplicate.email = "alice.j@example.com".to_string();
    let err = repo.create_employee(&duplicate).unwrap_err();
    assert!(matches!(err, RepoError::Conflict { .. }));

    let after = repo.list_employees(&EmployeeListQuery::default()).unwrap();
    assert_eq!(after.len(), 8);
    assert_eq!(after, before);
}

#[test]
fn update_unknown_id_is_not_found_and_changes_nothing() {
    let repo = seeded();
    let before = repo.list_employees(&EmployeeListQuery::default()).unwrap();

    let patch = EmployeeInput {
        name: Some("X".to_string()),
        ..EmployeeInput::default()
    };
    let err = repo.update_employee(Uuid::new_v4(), &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(
        repo.list_employees(&EmployeeListQuery::default()).unwrap(),
        before
    );
}

#[test]
fn update_to_taken_email_conflicts() {
    let repo = seeded();
    let bob = repo
        .list_employees(&EmployeeListQuery::default())
        .unwrap()
        .into_iter()
        .find(|employee| employee.email == "bob.s@example.com")
        .unwrap();

    let patch = EmployeeInput {
        email: Some("alice.j@example.com".to_string()),
        ..EmployeeInput::default()
    };
    let err = repo.update_employee(bob.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::Conflict { .. }));
    assert_eq!(repo.get_employee(bob.id).unwrap(), Some(bob));
}

#[test]
fn update_bumps_timestamp_and_moves_record_to_front() {
    let repo = seeded();
    let oldest = repo
        .list_employees(&EmployeeListQuery::default())
        .unwrap()
        .pop()
        .unwrap();

    thread::sleep(std::time::Duration::from_millis(5));
    let patch = EmployeeInput {
        tasks_completed: Some(i64::from(oldest.tasks_completed) + 1),
        ..EmployeeInput::default()
    };
    let updated = repo.update_employee(oldest.id, &patch).unwrap();
    assert!(updated.last_updated > oldest.last_updated);

    let listed = repo.list_employees(&EmployeeListQuery::default()).unwrap();
    assert_eq!(listed[0].id, oldest.id);
}

#[test]
fn list_supports_explicit_sort() {
    let repo = seeded();
    let listed = repo
        .list_employees(&EmployeeListQuery::sorted(
            SortField::TasksCompleted,
            SortDirection::Ascending,
        ))
        .unwrap();
    let tasks: Vec<_> = listed.iter().map(|e| e.tasks_completed).collect();
    assert_eq!(tasks, vec![45, 50, 60, 80, 95, 115, 120, 250]);
}

#[test]
fn concurrent_creates_with_same_email_admit_exactly_one() {
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|index| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut fields = seed_employees()[0].clone();
                fields.name = format!("Alice {index}");
                barrier.wait();
                repo.create_employee(&fields).is_ok()
            })
        })
        .collect();

    let created = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(created, 1);
    assert_eq!(repo.len(), 1);
}

#[test]
fn concurrent_updates_to_disjoint_records_all_apply() {
    let repo = Arc::new(seeded());
    let employees = repo.list_employees(&EmployeeListQuery::default()).unwrap();

    let handles: Vec<_> = employees
        .iter()
        .map(|employee| {
            let repo = Arc::clone(&repo);
            let id = employee.id;
            thread::spawn(move || {
                let patch = EmployeeInput {
                    performance_score: Some(50),
                    ..EmployeeInput::default()
                };
                repo.update_employee(id, &patch).unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let after = repo.list_employees(&EmployeeListQuery::default()).unwrap();
    assert!(after.iter().all(|employee| employee.performance_score == 50));
}

#[test]
fn concurrent_updates_to_one_record_are_serialized_and_never_torn() {
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let mut fields = seed_employees()[0].clone();
    fields.tasks_completed = u32::from(fields.performance_score);
    let id = repo.create_employee(&fields).unwrap().id;

    let writers = 4;
    let rounds = 50;
    let barrier = Arc::new(Barrier::new(writers + 1));

    let mut handles: Vec<_> = (0..writers)
        .map(|writer| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut last_seen = 0;
                barrier.wait();
                for round in 0..rounds {
                    let value = ((writer * rounds + round) % 101) as i64;
                    let patch = EmployeeInput {
                        performance_score: Some(value),
                        tasks_completed: Some(value),
                        ..EmployeeInput::default()
                    };
                    let updated = repo.update_employee(id, &patch).unwrap();
                    assert!(updated.last_updated >= last_seen);
                    last_seen = updated.last_updated;

                    let read = repo.get_employee(id).unwrap().unwrap();
                    assert_eq!(u32::from(read.performance_score), read.tasks_completed);
                    assert!(read.last_updated >= last_seen);
                    last_seen = read.last_updated;
                }
                last_seen
            })
        })
        .collect();

    let reader_repo = Arc::clone(&repo);
    let reader_barrier = Arc::clone(&barrier);
    handles.push(thread::spawn(move || {
        let mut last_seen = 0;
        reader_barrier.wait();
        for _ in 0..writers * rounds {
            let listed = reader_repo
                .list_employees(&EmployeeListQuery::default())
                .unwrap();
            let read = &listed[0];
            assert_eq!(u32::from(read.performance_score), read.tasks_completed);
            assert!(read.last_updated >= last_seen);
            last_seen = read.last_updated;
        }
        last_seen
    }));

    let observed_max = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .max()
        .unwrap();

    let last = repo.get_employee(id).unwrap().unwrap();
    assert_eq!(u32::from(last.performance_score), last.tasks_completed);
    assert!(last.last_updated >= observed_max);
    assert_eq!(repo.len(), 1);
}

#[test]
fn service_accepts_shared_repository_handle() {
    let repo = Arc::new(seeded());
    let service = EmployeeService::new(Arc::clone(&repo));

    let dashboard = service.dashboard(3).unwrap();
    assert_eq!(dashboard.total_employees, 8);
    assert_eq!(dashboard.recent.len(), 3);

    let borrowed = EmployeeService::new(repo.as_ref());
    assert_eq!(borrowed.list_employees(None).unwrap().len(), 8);
}
