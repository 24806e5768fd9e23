/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, HabitEntry, Day, UserConfig)
/// and their validation rules. These types represent the fundamental concepts
/// in our habit tracking system.

pub mod habit;
pub mod entry;
pub mod day;
pub mod config;

// Re-export public types for easy access
pub use habit::*;
pub use entry::*;
pub use day::*;
pub use config::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid habit title: {0}")]
    InvalidHabitTitle(String),

    #[error("Invalid habit description: {0}")]
    InvalidHabitDescription(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
}
