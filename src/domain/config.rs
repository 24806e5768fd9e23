/// UserConfig entity holding a user's tracked habits
///
/// One config exists per user id. Habits inside a config are unique by
/// title; the service enforces this when adding.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Habit};

/// Per-user configuration for habit tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Unique identifier for the user (storage key)
    pub user_id: String,
    /// Habits the user wants to track
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl UserConfig {
    /// Create an empty configuration for a user
    pub fn new(user_id: impl Into<String>) -> Result<Self, DomainError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(DomainError::InvalidUserId(
                "User id cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            user_id,
            habits: Vec::new(),
        })
    }

    /// Check whether a habit with the given title is already configured
    pub fn has_habit_with_title(&self, title: &str) -> bool {
        self.habits.iter().any(|h| h.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_is_empty() {
        let config = UserConfig::new("default_user").unwrap();
        assert_eq!(config.user_id, "default_user");
        assert!(config.habits.is_empty());
    }

    #[test]
    fn test_empty_user_id_rejected() {
        assert!(UserConfig::new("").is_err());
        assert!(UserConfig::new("  ").is_err());
    }

    #[test]
    fn test_title_lookup() {
        let mut config = UserConfig::new("u").unwrap();
        config
            .habits
            .push(Habit::new("Read", "Read a chapter").unwrap());

        assert!(config.has_habit_with_title("Read"));
        assert!(!config.has_habit_with_title("Run"));
    }
}
