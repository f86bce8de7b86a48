use crate::error::Result;
use crate::models::{GroupAverage, StudentAverage, StudentGrade, TableCounts};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database connection
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Database { conn })
    }

    /// Open an in-memory database with the schema created, for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Database { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize the database schema
    pub fn init(&self) -> Result<()> {
        self.create_tables()?;
        self.create_indexes()?;
        Ok(())
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS teachers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS subjects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                teacher_id INTEGER NOT NULL REFERENCES teachers(id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                group_id INTEGER NOT NULL REFERENCES groups(id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS grades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id INTEGER NOT NULL REFERENCES students(id),
                subject_id INTEGER NOT NULL REFERENCES subjects(id),
                grade REAL NOT NULL CHECK (grade >= 1.0 AND grade <= 5.0),
                date_received TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn create_indexes(&self) -> Result<()> {
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_subjects_teacher ON subjects(teacher_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_students_group ON students(group_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_grades_student ON grades(student_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_grades_subject ON grades(subject_id)",
            [],
        )?;
        Ok(())
    }

    /// Check if the schema has been created
    pub fn is_seeded(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='grades'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Begin a transaction
    pub fn transaction(&mut self) -> Result<rusqlite::Transaction<'_>> {
        self.conn.transaction().map_err(|e| e.into())
    }

    /// Get a reference to the underlying connection
    pub fn as_conn(&self) -> &Connection {
        &self.conn
    }

    /// Row counts for every table
    pub fn counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            groups: self.table_count("groups")?,
            teachers: self.table_count("teachers")?,
            subjects: self.table_count("subjects")?,
            students: self.table_count("students")?,
            grades: self.table_count("grades")?,
        })
    }

    fn table_count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        self.conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| e.into())
    }

    // ==================== Query Operations ====================

    /// Students with the highest average grade across all subjects,
    /// descending; ties broken by student id
    pub fn top_students(&self, limit: usize) -> Result<Vec<StudentAverage>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name, AVG(g.grade) AS average_grade
             FROM students s
             JOIN grades g ON g.student_id = s.id
             GROUP BY s.id
             ORDER BY average_grade DESC, s.id
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], student_average_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// The student with the highest average grade in one subject
    pub fn best_student_in_subject(&self, subject: &str) -> Result<Option<StudentAverage>> {
        self.conn
            .query_row(
                "SELECT s.name, AVG(g.grade) AS average_grade
                 FROM students s
                 JOIN grades g ON g.student_id = s.id
                 JOIN subjects sub ON sub.id = g.subject_id
                 WHERE sub.name = ?1
                 GROUP BY s.id
                 ORDER BY average_grade DESC, s.id
                 LIMIT 1",
                [subject],
                student_average_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    /// Average grade per group, restricted to one subject
    pub fn group_averages_in_subject(&self, subject: &str) -> Result<Vec<GroupAverage>> {
        let mut stmt = self.conn.prepare(
            "SELECT gr.name, AVG(g.grade) AS average_grade
             FROM groups gr
             JOIN students s ON s.group_id = gr.id
             JOIN grades g ON g.student_id = s.id
             JOIN subjects sub ON sub.id = g.subject_id
             WHERE sub.name = ?1
             GROUP BY gr.name
             ORDER BY gr.name",
        )?;

        let rows = stmt.query_map([subject], group_average_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// Average grade across every stored grade row; None when the table is empty
    pub fn overall_average(&self) -> Result<Option<f64>> {
        let avg: Option<f64> =
            self.conn
                .query_row("SELECT AVG(grade) FROM grades", [], |row| row.get(0))?;
        Ok(avg.map(round2))
    }

    /// Names of subjects taught by a teacher
    pub fn subjects_taught_by(&self, teacher: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT sub.name
             FROM subjects sub
             JOIN teachers t ON t.id = sub.teacher_id
             WHERE t.name = ?1
             ORDER BY sub.id",
        )?;

        let rows = stmt.query_map([teacher], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// Names of students in a group
    pub fn students_in_group(&self, group: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name
             FROM students s
             JOIN groups gr ON gr.id = s.group_id
             WHERE gr.name = ?1
             ORDER BY s.id",
        )?;

        let rows = stmt.query_map([group], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// (student, grade) pairs for a group in one subject
    pub fn group_grades_in_subject(&self, group: &str, subject: &str) -> Result<Vec<StudentGrade>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name, g.grade
             FROM students s
             JOIN groups gr ON gr.id = s.group_id
             JOIN grades g ON g.student_id = s.id
             JOIN subjects sub ON sub.id = g.subject_id
             WHERE gr.name = ?1 AND sub.name = ?2
             ORDER BY s.id, g.id",
        )?;

        let rows = stmt.query_map(params![group, subject], student_grade_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// Average grade across all subjects taught by a teacher; None when the
    /// teacher has no graded subjects
    pub fn teacher_average(&self, teacher: &str) -> Result<Option<f64>> {
        let avg: Option<f64> = self.conn.query_row(
            "SELECT AVG(g.grade)
             FROM grades g
             JOIN subjects sub ON sub.id = g.subject_id
             JOIN teachers t ON t.id = sub.teacher_id
             WHERE t.name = ?1",
            [teacher],
            |row| row.get(0),
        )?;
        Ok(avg.map(round2))
    }

    /// Names of subjects a student has grades in
    pub fn subjects_of_student(&self, student: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT sub.name
             FROM subjects sub
             JOIN grades g ON g.subject_id = sub.id
             JOIN students s ON s.id = g.student_id
             WHERE s.name = ?1
             ORDER BY sub.name",
        )?;

        let rows = stmt.query_map([student], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// Names of subjects a teacher taught to one student
    pub fn subjects_taught_to_student(&self, student: &str, teacher: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT sub.name
             FROM subjects sub
             JOIN grades g ON g.subject_id = sub.id
             JOIN students s ON s.id = g.student_id
             JOIN teachers t ON t.id = sub.teacher_id
             WHERE s.name = ?1 AND t.name = ?2
             ORDER BY sub.name",
        )?;

        let rows = stmt.query_map(params![student, teacher], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    // ==================== Report Sampling ====================

    pub fn first_teacher_name(&self) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT name FROM teachers ORDER BY id LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| e.into())
    }

    pub fn first_group_name(&self) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT name FROM groups ORDER BY id LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| e.into())
    }

    pub fn first_student_name(&self) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT name FROM students ORDER BY id LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| e.into())
    }

    /// The subject with the most grade rows, so the report's
    /// subject-parameterized sections have something to show
    pub fn busiest_subject_name(&self) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT sub.name
                 FROM subjects sub
                 JOIN grades g ON g.subject_id = sub.id
                 GROUP BY sub.id
                 ORDER BY COUNT(*) DESC, sub.id
                 LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.into())
    }
}

// ==================== Row Parsers ====================

fn student_average_from_row(row: &Row) -> std::result::Result<StudentAverage, rusqlite::Error> {
    Ok(StudentAverage {
        name: row.get(0)?,
        average: round2(row.get(1)?),
    })
}

fn group_average_from_row(row: &Row) -> std::result::Result<GroupAverage, rusqlite::Error> {
    Ok(GroupAverage {
        name: row.get(0)?,
        average: round2(row.get(1)?),
    })
}

fn student_grade_from_row(row: &Row) -> std::result::Result<StudentGrade, rusqlite::Error> {
    Ok(StudentGrade {
        name: row.get(0)?,
        grade: row.get(1)?,
    })
}

/// Round to 2 decimal places, half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two groups, two teachers, three subjects, three students:
    //   Ann Lee  (Group 1): Math 4.0, Physics 3.0
    //   Ben Ray  (Group 1): Math 5.0, History 2.0
    //   Cleo Fox (Group 2): Math 3.5, Physics 5.0, Physics 4.0
    // Karen Bush teaches Math and History, Miguel Reyes teaches Physics.
    fn fixture() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.as_conn()
            .execute_batch(
                "INSERT INTO groups (id, name) VALUES (1, 'Group 1'), (2, 'Group 2');
                 INSERT INTO teachers (id, name) VALUES (1, 'Karen Bush'), (2, 'Miguel Reyes');
                 INSERT INTO subjects (id, name, teacher_id) VALUES
                     (1, 'Math', 1), (2, 'Physics', 2), (3, 'History', 1);
                 INSERT INTO students (id, name, group_id) VALUES
                     (1, 'Ann Lee', 1), (2, 'Ben Ray', 1), (3, 'Cleo Fox', 2);
                 INSERT INTO grades (student_id, subject_id, grade, date_received) VALUES
                     (1, 1, 4.0, '2025-01-10'),
                     (1, 2, 3.0, '2025-01-11'),
                     (2, 1, 5.0, '2025-02-01'),
                     (2, 3, 2.0, '2025-02-02'),
                     (3, 1, 3.5, '2025-03-01'),
                     (3, 2, 5.0, '2025-03-02'),
                     (3, 2, 4.0, '2025-03-03');",
            )
            .unwrap();
        db
    }

    #[test]
    fn top_students_ranks_by_average_with_stable_ties() {
        let db = fixture();
        let rows = db.top_students(5).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Cleo Fox");
        assert_eq!(rows[0].average, 4.17);
        // Ann and Ben both average 3.5; lower student id first
        assert_eq!(rows[1].name, "Ann Lee");
        assert_eq!(rows[1].average, 3.5);
        assert_eq!(rows[2].name, "Ben Ray");
        assert_eq!(rows[2].average, 3.5);
    }

    #[test]
    fn top_students_caps_at_limit() {
        let db = fixture();
        let rows = db.top_students(2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Cleo Fox");
    }

    #[test]
    fn best_student_in_subject_picks_highest_average() {
        let db = fixture();

        let best = db.best_student_in_subject("Math").unwrap().unwrap();
        assert_eq!(best.name, "Ben Ray");
        assert_eq!(best.average, 5.0);

        // Cleo averages 4.5 in Physics, beating Ann's 3.0
        let best = db.best_student_in_subject("Physics").unwrap().unwrap();
        assert_eq!(best.name, "Cleo Fox");
        assert_eq!(best.average, 4.5);
    }

    #[test]
    fn best_student_in_unknown_subject_is_none() {
        let db = fixture();
        assert!(db.best_student_in_subject("Alchemy").unwrap().is_none());
    }

    #[test]
    fn group_averages_restricted_to_subject() {
        let db = fixture();
        let rows = db.group_averages_in_subject("Math").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Group 1");
        assert_eq!(rows[0].average, 4.5);
        assert_eq!(rows[1].name, "Group 2");
        assert_eq!(rows[1].average, 3.5);
    }

    #[test]
    fn group_averages_in_unknown_subject_is_empty() {
        let db = fixture();
        assert!(db.group_averages_in_subject("Alchemy").unwrap().is_empty());
    }

    #[test]
    fn overall_average_is_rounded_mean_of_all_grades() {
        let db = fixture();
        // (4 + 3 + 5 + 2 + 3.5 + 5 + 4) / 7 = 3.7857...
        assert_eq!(db.overall_average().unwrap(), Some(3.79));
    }

    #[test]
    fn overall_average_on_empty_table_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.overall_average().unwrap(), None);
    }

    #[test]
    fn subjects_taught_by_lists_the_teachers_courses() {
        let db = fixture();
        assert_eq!(
            db.subjects_taught_by("Karen Bush").unwrap(),
            vec!["Math", "History"]
        );
        assert_eq!(db.subjects_taught_by("Miguel Reyes").unwrap(), vec!["Physics"]);
        assert!(db.subjects_taught_by("Nobody Special").unwrap().is_empty());
    }

    #[test]
    fn students_in_group_lists_the_roster() {
        let db = fixture();
        assert_eq!(
            db.students_in_group("Group 1").unwrap(),
            vec!["Ann Lee", "Ben Ray"]
        );
        assert!(db.students_in_group("Group 9").unwrap().is_empty());
    }

    #[test]
    fn group_grades_in_subject_pairs_names_with_raw_grades() {
        let db = fixture();
        let rows = db.group_grades_in_subject("Group 1", "Math").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ann Lee");
        assert_eq!(rows[0].grade, 4.0);
        assert_eq!(rows[1].name, "Ben Ray");
        assert_eq!(rows[1].grade, 5.0);

        assert!(db
            .group_grades_in_subject("Group 1", "Alchemy")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn teacher_average_spans_all_their_subjects() {
        let db = fixture();
        // Karen Bush: Math (4, 5, 3.5) + History (2) = 14.5 / 4 = 3.625
        assert_eq!(db.teacher_average("Karen Bush").unwrap(), Some(3.63));
        assert_eq!(db.teacher_average("Nobody Special").unwrap(), None);
    }

    #[test]
    fn subjects_of_student_deduplicates_repeat_grades() {
        let db = fixture();
        // Cleo has two Physics grades but Physics appears once
        assert_eq!(
            db.subjects_of_student("Cleo Fox").unwrap(),
            vec!["Math", "Physics"]
        );
        assert!(db.subjects_of_student("Nobody Special").unwrap().is_empty());
    }

    #[test]
    fn subjects_taught_to_student_filters_by_teacher() {
        let db = fixture();
        assert_eq!(
            db.subjects_taught_to_student("Cleo Fox", "Miguel Reyes")
                .unwrap(),
            vec!["Physics"]
        );
        assert_eq!(
            db.subjects_taught_to_student("Cleo Fox", "Karen Bush").unwrap(),
            vec!["Math"]
        );
        assert!(db
            .subjects_taught_to_student("Cleo Fox", "Nobody Special")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn grade_outside_range_is_rejected_by_schema() {
        let db = fixture();
        let result = db.as_conn().execute(
            "INSERT INTO grades (student_id, subject_id, grade, date_received)
             VALUES (1, 1, 5.5, '2025-04-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn report_sampling_prefers_the_busiest_subject() {
        let db = fixture();
        assert_eq!(db.first_teacher_name().unwrap().as_deref(), Some("Karen Bush"));
        assert_eq!(db.first_group_name().unwrap().as_deref(), Some("Group 1"));
        assert_eq!(db.first_student_name().unwrap().as_deref(), Some("Ann Lee"));
        // Math has 3 grade rows, Physics 3... Math wins the tie on subject id
        assert_eq!(db.busiest_subject_name().unwrap().as_deref(), Some("Math"));
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(3.625), 3.63);
        assert_eq!(round2(4.16666), 4.17);
        assert_eq!(round2(3.5), 3.5);
    }
}
