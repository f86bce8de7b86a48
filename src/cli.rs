use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Academic records seeding and reporting over SQLite")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, default_value = "gradebook.db")]
    pub db: PathBuf,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wipe and repopulate the database with synthetic records
    Seed {
        /// Number of student groups
        #[arg(long, default_value_t = 3)]
        groups: usize,
        /// Number of teachers
        #[arg(long, default_value_t = 5)]
        teachers: usize,
        /// Number of subjects
        #[arg(long, default_value_t = 8)]
        subjects: usize,
        /// Number of students
        #[arg(long, default_value_t = 50)]
        students: usize,
        /// Upper bound of grades generated per student
        #[arg(long, default_value_t = 20)]
        max_grades: usize,
        /// Seed for the random generator, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Top students by average grade across all subjects
    TopStudents {
        /// How many students to list
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// The student with the highest average grade in one subject
    BestInSubject {
        /// Subject name
        subject: String,
    },

    /// Average grade per group for one subject
    GroupAverages {
        /// Subject name
        subject: String,
    },

    /// Average grade across every stored grade
    Average,

    /// Subjects taught by a teacher
    TaughtBy {
        /// Teacher name
        teacher: String,
    },

    /// Students enrolled in a group
    Roster {
        /// Group name
        group: String,
    },

    /// Per-student grades for a group in one subject
    GroupGrades {
        /// Group name
        group: String,
        /// Subject name
        subject: String,
    },

    /// Average grade across all subjects taught by a teacher
    TeacherAverage {
        /// Teacher name
        teacher: String,
    },

    /// Subjects a student has grades in
    StudentSubjects {
        /// Student name
        student: String,
    },

    /// Subjects a teacher taught to one student
    StudentTeacherSubjects {
        /// Student name
        student: String,
        /// Teacher name
        teacher: String,
    },

    /// Run every query against sampled names and print a full report
    Report,
}
