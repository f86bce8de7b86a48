pub mod cli;
pub mod cli_handlers;
pub mod db;
pub mod error;
pub mod models;
pub mod names;
pub mod seed;

pub use error::{GradebookError, Result};
pub use models::*;
