/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a habit the user
/// wants to track, along with its validation rules. A habit is identified by
/// its id; uniqueness inside a user's configuration is checked by title.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// A habit represents something the user wants to do regularly
///
/// Habits are immutable once created: they are replaced whole, never edited
/// field by field. The id is generated on creation and regenerated when a
/// stored record carries a missing or blank id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    #[serde(default = "generate_habit_id", deserialize_with = "habit_id_or_new")]
    pub id: String,
    /// Display name, unique per user when added through the service
    pub title: String,
    /// What this habit is about
    pub description: String,
}

impl Habit {
    /// Create a new habit with a fresh id, validating title and description
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let description = description.into();

        if title.trim().is_empty() {
            return Err(DomainError::InvalidHabitTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(DomainError::InvalidHabitDescription(
                "Habit description cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: generate_habit_id(),
            title,
            description,
        })
    }

    /// Create a habit from existing data (used when loading stored records)
    ///
    /// Assumes the data was validated when it was first created.
    pub fn from_existing(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

fn generate_habit_id() -> String {
    Uuid::new_v4().to_string()
}

/// Accept stored ids as-is, replacing null or blank ones with a fresh UUID
fn habit_id_or_new<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<String>::deserialize(deserializer)?;
    Ok(match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => generate_habit_id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_habit() {
        let habit = Habit::new("Morning Run", "30-minute jog around the neighborhood");

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.title, "Morning Run");
        assert!(!habit.id.is_empty());
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = Habit::new("", "Some description");
        assert!(result.is_err());

        let result = Habit::new("   ", "Some description");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_description_rejected() {
        let result = Habit::new("Read", "");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_habits_get_distinct_ids() {
        let a = Habit::new("Read", "Read a chapter").unwrap();
        let b = Habit::new("Read", "Read a chapter").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_missing_id_regenerated_on_load() {
        let habit: Habit =
            serde_json::from_str(r#"{"title": "Read", "description": "A chapter"}"#).unwrap();
        assert!(!habit.id.is_empty());

        let habit: Habit =
            serde_json::from_str(r#"{"id": "", "title": "Read", "description": "A chapter"}"#)
                .unwrap();
        assert!(!habit.id.is_empty());

        let habit: Habit =
            serde_json::from_str(r#"{"id": null, "title": "Read", "description": "A chapter"}"#)
                .unwrap();
        assert!(!habit.id.is_empty());
    }

    #[test]
    fn test_stored_id_preserved_on_load() {
        let habit: Habit = serde_json::from_str(
            r#"{"id": "habit-1", "title": "Read", "description": "A chapter"}"#,
        )
        .unwrap();
        assert_eq!(habit.id, "habit-1");
    }
}
