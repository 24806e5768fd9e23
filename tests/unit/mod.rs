/// Basic unit tests to verify core functionality
use habits_tracker::*;
use tempfile::tempdir;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new("Morning Run", "30-minute jog around the neighborhood");

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.title, "Morning Run");
        assert!(!habit.id.is_empty());
    }

    #[test]
    fn test_blank_habit_rejected() {
        assert!(Habit::new("", "description").is_err());
        assert!(Habit::new("title", " ").is_err());
    }

    #[test]
    fn test_habit_entry_predicates() {
        let completed = HabitEntry::completed("habit-1", None);
        assert!(completed.is_completed());
        assert_eq!(completed.completion_value(), Some(1));

        let failed = HabitEntry::failed("habit-1", None);
        assert!(failed.is_failed());
        assert_eq!(failed.completion_value(), Some(-1));

        let unspecified = HabitEntry::recorded("habit-1", None, None);
        assert!(!unspecified.is_completed());
        assert!(!unspecified.is_failed());
    }

    #[test]
    fn test_date_path_parsing() {
        let parsed = parse_date_path("aug/12/2020").unwrap();
        assert_eq!(parsed.to_string(), "2020-08-12");

        assert_eq!(parse_date_path(&format_date_path(parsed)).unwrap(), parsed);
        assert!(parse_date_path("2100/1/1").is_err());
        assert!(parse_date_path("notaday").is_err());
    }

    #[test]
    fn test_navigation_blocks_future() {
        let nav = navigation_for(parse_date_path("today").unwrap());
        assert!(nav.is_today);
        assert!(!nav.can_go_next);
        assert_eq!(nav.next_date, None);
    }

    #[test]
    fn test_repository_creation() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(JsonDayRepository::new(dir.path()).is_ok());
        assert!(JsonUserConfigRepository::new(dir.path()).is_ok());
    }

    #[test]
    fn test_tracker_creation() {
        let dir = tempdir().expect("Failed to create temp dir");
        let tracker = HabitTracker::open(dir.path());
        assert!(tracker.is_ok());
    }

    #[test]
    fn test_repository_interfaces_are_object_safe() {
        let dir = tempdir().expect("Failed to create temp dir");
        let days = JsonDayRepository::new(dir.path()).expect("Failed to create repository");
        let configs =
            JsonUserConfigRepository::new(dir.path()).expect("Failed to create repository");

        let _: &dyn DayRepository = &days;
        let _: &dyn UserConfigRepository = &configs;
    }
}
