use crate::db::Database;
use crate::error::{GradebookError, Result};
use crate::models::{GroupAverage, StudentAverage, StudentGrade};
use crate::seed::{self, SeedConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::path::Path;

fn open_seeded(db_path: &Path) -> Result<Database> {
    let db = Database::open(db_path)?;
    if !db.is_seeded()? {
        return Err(GradebookError::NotSeeded);
    }
    Ok(db)
}

/// Handle the seed command
pub fn handle_seed(
    db_path: &Path,
    json: bool,
    config: &SeedConfig,
    seed: Option<u64>,
) -> Result<()> {
    let mut db = Database::open(db_path)?;
    let mut rng = match seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_entropy(),
    };

    let counts = seed::run(&mut db, config, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("Seeded database at {}", db_path.display());
    println!("  Groups: {}", counts.groups);
    println!("  Teachers: {}", counts.teachers);
    println!("  Subjects: {}", counts.subjects);
    println!("  Students: {}", counts.students);
    println!("  Grades: {}", counts.grades);

    Ok(())
}

/// Handle the top-students command
pub fn handle_top_students(db_path: &Path, json: bool, limit: usize) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.top_students(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No grades recorded yet.");
        return Ok(());
    }

    println!("Top students by average grade:");
    print_student_averages(&rows);

    Ok(())
}

/// Handle the best-in-subject command
pub fn handle_best_in_subject(db_path: &Path, json: bool, subject: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let best = db.best_student_in_subject(subject)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&best)?);
        return Ok(());
    }

    match best {
        Some(row) => println!("Best in {}: {} ({:.2})", subject, row.name, row.average),
        None => println!("No grades recorded for subject '{subject}'."),
    }

    Ok(())
}

/// Handle the group-averages command
pub fn handle_group_averages(db_path: &Path, json: bool, subject: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.group_averages_in_subject(subject)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No grades recorded for subject '{subject}'.");
        return Ok(());
    }

    println!("Average grade per group in {subject}:");
    print_group_averages(&rows);

    Ok(())
}

/// Handle the average command
pub fn handle_average(db_path: &Path, json: bool) -> Result<()> {
    let db = open_seeded(db_path)?;
    let average = db.overall_average()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&average)?);
        return Ok(());
    }

    match average {
        Some(value) => println!("Overall average grade: {value:.2}"),
        None => println!("No grades recorded yet."),
    }

    Ok(())
}

/// Handle the taught-by command
pub fn handle_taught_by(db_path: &Path, json: bool, teacher: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.subjects_taught_by(teacher)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No subjects found for teacher '{teacher}'.");
        return Ok(());
    }

    println!("Subjects taught by {teacher}:");
    print_names(&rows);

    Ok(())
}

/// Handle the roster command
pub fn handle_roster(db_path: &Path, json: bool, group: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.students_in_group(group)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No students found in group '{group}'.");
        return Ok(());
    }

    println!("Students in {group}:");
    print_names(&rows);

    Ok(())
}

/// Handle the group-grades command
pub fn handle_group_grades(db_path: &Path, json: bool, group: &str, subject: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.group_grades_in_subject(group, subject)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No grades found in '{group}' for '{subject}'.");
        return Ok(());
    }

    println!("Grades in {group} for {subject}:");
    print_student_grades(&rows);

    Ok(())
}

/// Handle the teacher-average command
pub fn handle_teacher_average(db_path: &Path, json: bool, teacher: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let average = db.teacher_average(teacher)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&average)?);
        return Ok(());
    }

    match average {
        Some(value) => println!("Average grade given by {teacher}: {value:.2}"),
        None => println!("No grades found for teacher '{teacher}'."),
    }

    Ok(())
}

/// Handle the student-subjects command
pub fn handle_student_subjects(db_path: &Path, json: bool, student: &str) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.subjects_of_student(student)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No subjects found for student '{student}'.");
        return Ok(());
    }

    println!("Subjects {student} has grades in:");
    print_names(&rows);

    Ok(())
}

/// Handle the student-teacher-subjects command
pub fn handle_student_teacher_subjects(
    db_path: &Path,
    json: bool,
    student: &str,
    teacher: &str,
) -> Result<()> {
    let db = open_seeded(db_path)?;
    let rows = db.subjects_taught_to_student(student, teacher)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No subjects found for '{student}' with '{teacher}'.");
        return Ok(());
    }

    println!("Subjects {teacher} taught to {student}:");
    print_names(&rows);

    Ok(())
}

/// Handle the report command: run all ten queries against names sampled
/// from the stored data
pub fn handle_report(db_path: &Path, as_json: bool) -> Result<()> {
    let db = open_seeded(db_path)?;

    let teacher = db.first_teacher_name()?.unwrap_or_default();
    let group = db.first_group_name()?.unwrap_or_default();
    let student = db.first_student_name()?.unwrap_or_default();
    let subject = db.busiest_subject_name()?.unwrap_or_default();

    let top = db.top_students(5)?;
    let best = db.best_student_in_subject(&subject)?;
    let group_averages = db.group_averages_in_subject(&subject)?;
    let overall = db.overall_average()?;
    let taught = db.subjects_taught_by(&teacher)?;
    let roster = db.students_in_group(&group)?;
    let group_grades = db.group_grades_in_subject(&group, &subject)?;
    let teacher_avg = db.teacher_average(&teacher)?;
    let student_subjects = db.subjects_of_student(&student)?;
    let taught_to = db.subjects_taught_to_student(&student, &teacher)?;

    if as_json {
        let report = json!({
            "top_students": top,
            "best_in_subject": { "subject": subject, "student": best },
            "group_averages": { "subject": subject, "groups": group_averages },
            "overall_average": overall,
            "subjects_taught_by": { "teacher": teacher, "subjects": taught },
            "roster": { "group": group, "students": roster },
            "group_grades": { "group": group, "subject": subject, "grades": group_grades },
            "teacher_average": { "teacher": teacher, "average": teacher_avg },
            "student_subjects": { "student": student, "subjects": student_subjects },
            "student_teacher_subjects": {
                "student": student,
                "teacher": teacher,
                "subjects": taught_to,
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Top 5 Students by Average Grade");
    if top.is_empty() {
        println!("  No results found.");
    } else {
        print_student_averages(&top);
    }

    println!();
    println!("Best Student in {subject}");
    match &best {
        Some(row) => println!("  {} ({:.2})", row.name, row.average),
        None => println!("  No results found."),
    }

    println!();
    println!("Average Grade per Group in {subject}");
    if group_averages.is_empty() {
        println!("  No results found.");
    } else {
        print_group_averages(&group_averages);
    }

    println!();
    println!("Overall Average Grade");
    match overall {
        Some(value) => println!("  {value:.2}"),
        None => println!("  No results found."),
    }

    println!();
    println!("Subjects Taught by {teacher}");
    if taught.is_empty() {
        println!("  No results found.");
    } else {
        print_names(&taught);
    }

    println!();
    println!("Students in {group}");
    if roster.is_empty() {
        println!("  No results found.");
    } else {
        print_names(&roster);
    }

    println!();
    println!("Grades in {group} for {subject}");
    if group_grades.is_empty() {
        println!("  No results found.");
    } else {
        print_student_grades(&group_grades);
    }

    println!();
    println!("Average Grade Given by {teacher}");
    match teacher_avg {
        Some(value) => println!("  {value:.2}"),
        None => println!("  No results found."),
    }

    println!();
    println!("Subjects {student} Has Grades in");
    if student_subjects.is_empty() {
        println!("  No results found.");
    } else {
        print_names(&student_subjects);
    }

    println!();
    println!("Subjects {teacher} Taught to {student}");
    if taught_to.is_empty() {
        println!("  No results found.");
    } else {
        print_names(&taught_to);
    }

    Ok(())
}

// ==================== Result Rendering ====================

fn print_student_averages(rows: &[StudentAverage]) {
    for (i, row) in rows.iter().enumerate() {
        println!("  {}. {} ({:.2})", i + 1, row.name, row.average);
    }
}

fn print_group_averages(rows: &[GroupAverage]) {
    for row in rows {
        println!("  {}: {:.2}", row.name, row.average);
    }
}

fn print_student_grades(rows: &[StudentGrade]) {
    for row in rows {
        println!("  {}: {}", row.name, row.grade);
    }
}

fn print_names(rows: &[String]) {
    for name in rows {
        println!("  - {name}");
    }
}
