//! Demo employee records for local runs.

use crate::model::employee::EmployeeFields;

const SEED_ROWS: &[(&str, &str, &str, &str, u8, u32)] = &[
    ("Alice Johnson", "alice.j@example.com", "Frontend Developer", "Engineering", 92, 120),
    ("Bob Smith", "bob.s@example.com", "Backend Developer", "Engineering", 88, 115),
    ("Charlie Brown", "charlie.b@example.com", "UI/UX Designer", "Design", 95, 80),
    ("Diana Prince", "diana.p@example.com", "Project Manager", "Management", 90, 50),
    ("Ethan Hunt", "ethan.h@example.com", "QA Engineer", "Engineering", 85, 250),
    ("Fiona Glenanne", "fiona.g@example.com", "DevOps Specialist", "Engineering", 91, 95),
    ("George Costanza", "george.c@example.com", "Product Owner", "Product", 82, 45),
    ("Hannah Montana", "hannah.m@example.com", "Marketing Lead", "Marketing", 96, 60),
];

/// Returns the demo employee set in a fixed order.
pub fn seed_employees() -> Vec<EmployeeFields> {
    SEED_ROWS
        .iter()
        .map(
            |&(name, email, position, department, performance_score, tasks_completed)| {
                EmployeeFields {
                    name: name.to_string(),
                    email: email.to_string(),
                    position: position.to_string(),
                    department: department.to_string(),
                    performance_score,
                    tasks_completed,
                }
            },
        )
        .collect()
}
