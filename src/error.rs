use thiserror::Error;

/// All possible errors in the gradebook tool
#[derive(Error, Debug)]
pub enum GradebookError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database has no schema yet. Run `gradebook seed` first.")]
    NotSeeded,

    #[error("Invalid seed configuration: {0}")]
    InvalidSeedConfig(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GradebookError>;
