//! Compiled-in pools for synthetic person and course names.

use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Andrew", "Anna", "Boris", "Carmen", "Daniel", "Elena", "Felix", "Grace", "Henry",
    "Irene", "Jacob", "Karen", "Liam", "Maria", "Miguel", "Nadia", "Oscar", "Paula", "Robert",
    "Sofia", "Tomas", "Vera", "Walter",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Bennett", "Bush", "Carter", "Diaz", "Evans", "Foster", "Garcia", "Hughes", "Ivanov",
    "Jensen", "Kowalski", "Lopez", "Mercer", "Novak", "Olsen", "Petrov", "Quinn", "Reyes", "Smith",
    "Turner", "Vance", "Wilson", "Young",
];

const COURSE_NAMES: &[&str] = &[
    "Mathematics", "Physics", "Chemistry", "Biology", "History", "Geography", "Literature",
    "Philosophy", "Economics", "Statistics", "Programming", "Databases", "Algorithms",
    "Linear Algebra", "Calculus", "Astronomy", "Sociology", "Psychology", "Rhetoric",
    "Ethics",
];

/// Random "First Last" person name
pub fn person_name<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

/// Random course name
pub fn course_name<R: Rng>(rng: &mut R) -> &'static str {
    COURSE_NAMES[rng.gen_range(0..COURSE_NAMES.len())]
}
