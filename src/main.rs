use clap::Parser;
use gradebook::cli::{Cli, Commands};
use gradebook::cli_handlers;
use gradebook::seed::SeedConfig;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let db = cli.db;
    let json = cli.json;

    let result = match cli.command {
        Commands::Seed {
            groups,
            teachers,
            subjects,
            students,
            max_grades,
            seed,
        } => {
            let config = SeedConfig {
                groups,
                teachers,
                subjects,
                students,
                max_grades_per_student: max_grades,
            };
            cli_handlers::handle_seed(&db, json, &config, seed)
        }
        Commands::TopStudents { limit } => cli_handlers::handle_top_students(&db, json, limit),
        Commands::BestInSubject { subject } => {
            cli_handlers::handle_best_in_subject(&db, json, &subject)
        }
        Commands::GroupAverages { subject } => {
            cli_handlers::handle_group_averages(&db, json, &subject)
        }
        Commands::Average => cli_handlers::handle_average(&db, json),
        Commands::TaughtBy { teacher } => cli_handlers::handle_taught_by(&db, json, &teacher),
        Commands::Roster { group } => cli_handlers::handle_roster(&db, json, &group),
        Commands::GroupGrades { group, subject } => {
            cli_handlers::handle_group_grades(&db, json, &group, &subject)
        }
        Commands::TeacherAverage { teacher } => {
            cli_handlers::handle_teacher_average(&db, json, &teacher)
        }
        Commands::StudentSubjects { student } => {
            cli_handlers::handle_student_subjects(&db, json, &student)
        }
        Commands::StudentTeacherSubjects { student, teacher } => {
            cli_handlers::handle_student_teacher_subjects(&db, json, &student, &teacher)
        }
        Commands::Report => cli_handlers::handle_report(&db, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
