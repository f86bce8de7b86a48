use serde::Serialize;

/// A student name paired with an average grade, rounded to 2 decimals
#[derive(Debug, Clone, Serialize)]
pub struct StudentAverage {
    pub name: String,
    pub average: f64,
}

/// A group name paired with an average grade, rounded to 2 decimals
#[derive(Debug, Clone, Serialize)]
pub struct GroupAverage {
    pub name: String,
    pub average: f64,
}

/// One grade row paired with the name of the student who received it.
/// The grade value is returned as stored, without rounding.
#[derive(Debug, Clone, Serialize)]
pub struct StudentGrade {
    pub name: String,
    pub grade: f64,
}

/// Row counts across the five tables
#[derive(Debug, Clone, Serialize)]
pub struct TableCounts {
    pub groups: i64,
    pub teachers: i64,
    pub subjects: i64,
    pub students: i64,
    pub grades: i64,
}
