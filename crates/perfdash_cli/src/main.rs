//! Command-line front end for the employee performance store.
//!
//! # Responsibility
//! - Map subcommands onto `EmployeeService` operations.
//! - Print results as JSON on stdout and errors on stderr.
//!
//! # Invariants
//! - Every failure exits non-zero; nothing is retried.

use clap::{Args, Parser, Subcommand};
use log::info;
use perfdash_core::db::open_db;
use perfdash_core::{
    default_log_level, init_logging, seed_employees, EmployeeInput, EmployeeService, LogConfig,
    SortDirection, SortField, SortState, SqliteEmployeeRepository, ViewQuery, ALL_DEPARTMENTS,
    DASHBOARD_RECENT_LIMIT, TOP_PERFORMERS_LIMIT,
};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "perfdash", version, about = "Track employee performance records")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "PERFDASH_DB", default_value = "perfdash.sqlite3")]
    db: PathBuf,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true, env = "PERFDASH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "PERFDASH_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List employees, optionally sorted and filtered.
    List {
        /// Sort column, e.g. `name` or `performanceScore`.
        #[arg(long, value_parser = parse_sort_field)]
        sort: Option<SortField>,
        /// Sort descending instead of ascending.
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Case-insensitive match on name or email.
        #[arg(long, default_value = "")]
        search: String,
        /// Exact department, or `all`.
        #[arg(long, default_value = ALL_DEPARTMENTS)]
        department: String,
    },
    /// Show one employee.
    Get { id: String },
    /// Create an employee.
    Add(EmployeeArgs),
    /// Update fields of an existing employee.
    Update {
        id: String,
        #[command(flatten)]
        fields: EmployeeArgs,
    },
    /// Delete an employee.
    Delete { id: String },
    /// Headline figures, score histogram and recent activity.
    Dashboard {
        #[arg(long, default_value_t = DASHBOARD_RECENT_LIMIT)]
        recent: usize,
    },
    /// Per-department breakdown and top performers.
    Stats {
        #[arg(long, default_value_t = TOP_PERFORMERS_LIMIT)]
        top: usize,
    },
    /// Load the demo roster; existing emails are skipped.
    Seed,
}

#[derive(Debug, Args)]
struct EmployeeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    score: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    tasks: Option<i64>,
}

impl From<EmployeeArgs> for EmployeeInput {
    fn from(args: EmployeeArgs) -> Self {
        EmployeeInput {
            name: args.name,
            email: args.email,
            position: args.position,
            department: args.department,
            performance_score: args.score,
            tasks_completed: args.tasks,
        }
    }
}

fn parse_sort_field(value: &str) -> Result<SortField, String> {
    SortField::parse(value).ok_or_else(|| format!("unknown sort field `{value}`"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(&LogConfig::new(level, dir)?)?;
    }

    info!("event=cli_run module=cli status=start db={}", cli.db.display());
    let conn = open_db(&cli.db)?;
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn)?);

    match cli.command {
        Command::List {
            sort,
            desc,
            search,
            department,
        } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let query = ViewQuery {
                sort: sort.map(|field| SortState::new(field, direction)),
                search,
                department,
            };
            print_json(&service.table_view(&query)?.employees)
        }
        Command::Get { id } => print_json(&service.get_employee(&id)?),
        Command::Add(fields) => print_json(&service.create_employee(&fields.into())?),
        Command::Update { id, fields } => {
            let patch = EmployeeInput::from(fields);
            if patch.is_empty() {
                return Err("update needs at least one field".into());
            }
            print_json(&service.update_employee(&id, &patch)?)
        }
        Command::Delete { id } => {
            service.delete_employee(&id)?;
            println!("deleted {id}");
            Ok(())
        }
        Command::Dashboard { recent } => print_json(&service.dashboard(recent)?),
        Command::Stats { top } => print_json(&service.performance_stats(top)?),
        Command::Seed => print_json(&service.import_employees(&seed_employees())?),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use perfdash_core::SortField;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_accepts_wire_and_snake_case_sort_names() {
        for name in ["performanceScore", "performance_score"] {
            let cli = Cli::parse_from(["perfdash", "list", "--sort", name, "--desc"]);
            match cli.command {
                Command::List { sort, desc, .. } => {
                    assert_eq!(sort, Some(SortField::PerformanceScore));
                    assert!(desc);
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn update_keeps_unset_fields_empty() {
        let cli = Cli::parse_from(["perfdash", "update", "abc", "--score", "77"]);
        match cli.command {
            Command::Update { id, fields } => {
                assert_eq!(id, "abc");
                let patch = perfdash_core::EmployeeInput::from(fields);
                assert_eq!(patch.performance_score, Some(77));
                assert!(patch.name.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
