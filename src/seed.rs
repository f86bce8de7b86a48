//! Synthetic data generation for the five tables.

use crate::db::Database;
use crate::error::{GradebookError, Result};
use crate::models::TableCounts;
use crate::names;
use chrono::{Duration, Utc};
use rand::Rng;
use rusqlite::params;
use tracing::info;

/// Grades land in the past two years
const MAX_GRADE_AGE_DAYS: i64 = 730;

/// How many rows a seeding run generates
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub groups: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub students: usize,
    pub max_grades_per_student: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            groups: 3,
            teachers: 5,
            subjects: 8,
            students: 50,
            max_grades_per_student: 20,
        }
    }
}

impl SeedConfig {
    /// Reject configurations that would generate a row without a parent to
    /// reference before anything is written
    pub fn validate(&self) -> Result<()> {
        if self.subjects > 0 && self.teachers == 0 {
            return Err(GradebookError::InvalidSeedConfig(
                "subjects need at least one teacher".to_string(),
            ));
        }
        if self.students > 0 {
            if self.groups == 0 {
                return Err(GradebookError::InvalidSeedConfig(
                    "students need at least one group".to_string(),
                ));
            }
            if self.subjects == 0 {
                return Err(GradebookError::InvalidSeedConfig(
                    "grades need at least one subject".to_string(),
                ));
            }
            if self.max_grades_per_student == 0 {
                return Err(GradebookError::InvalidSeedConfig(
                    "every student receives at least one grade".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Wipe all five tables and repopulate them with randomized,
/// referentially-consistent rows.
///
/// The wipe and every insert run inside one transaction: any failure rolls
/// the database back to its pre-run state.
pub fn run<R: Rng>(db: &mut Database, config: &SeedConfig, rng: &mut R) -> Result<TableCounts> {
    config.validate()?;
    db.init()?;

    let tx = db.transaction()?;

    // children before parents, so foreign keys stay satisfied
    tx.execute("DELETE FROM grades", [])?;
    tx.execute("DELETE FROM students", [])?;
    tx.execute("DELETE FROM subjects", [])?;
    tx.execute("DELETE FROM teachers", [])?;
    tx.execute("DELETE FROM groups", [])?;

    let mut group_ids = Vec::with_capacity(config.groups);
    for i in 0..config.groups {
        tx.execute(
            "INSERT INTO groups (name) VALUES (?1)",
            [format!("Group {}", i + 1)],
        )?;
        group_ids.push(tx.last_insert_rowid());
    }
    info!(count = group_ids.len(), "seeded groups");

    let mut teacher_ids = Vec::with_capacity(config.teachers);
    for _ in 0..config.teachers {
        tx.execute(
            "INSERT INTO teachers (name) VALUES (?1)",
            [names::person_name(rng)],
        )?;
        teacher_ids.push(tx.last_insert_rowid());
    }
    info!(count = teacher_ids.len(), "seeded teachers");

    let mut subject_ids = Vec::with_capacity(config.subjects);
    for _ in 0..config.subjects {
        let teacher_id = teacher_ids[rng.gen_range(0..teacher_ids.len())];
        tx.execute(
            "INSERT INTO subjects (name, teacher_id) VALUES (?1, ?2)",
            params![names::course_name(rng), teacher_id],
        )?;
        subject_ids.push(tx.last_insert_rowid());
    }
    info!(count = subject_ids.len(), "seeded subjects");

    let mut student_ids = Vec::with_capacity(config.students);
    for _ in 0..config.students {
        let group_id = group_ids[rng.gen_range(0..group_ids.len())];
        tx.execute(
            "INSERT INTO students (name, group_id) VALUES (?1, ?2)",
            params![names::person_name(rng), group_id],
        )?;
        student_ids.push(tx.last_insert_rowid());
    }
    info!(count = student_ids.len(), "seeded students");

    let today = Utc::now().date_naive();
    let mut grade_count = 0usize;
    for &student_id in &student_ids {
        for _ in 0..rng.gen_range(1..=config.max_grades_per_student) {
            let subject_id = subject_ids[rng.gen_range(0..subject_ids.len())];
            let grade: f64 = rng.gen_range(1.0..=5.0);
            let date_received = today - Duration::days(rng.gen_range(0..=MAX_GRADE_AGE_DAYS));
            tx.execute(
                "INSERT INTO grades (student_id, subject_id, grade, date_received)
                 VALUES (?1, ?2, ?3, ?4)",
                params![student_id, subject_id, grade, date_received],
            )?;
            grade_count += 1;
        }
    }
    info!(count = grade_count, "seeded grades");

    tx.commit()?;

    db.counts()
}
