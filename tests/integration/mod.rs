/// End-to-end tests driving the tracker through its public interface
use chrono::NaiveDate;
use habits_tracker::*;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_daily_tracking_workflow() {
        let dir = tempdir().expect("Failed to create temp dir");
        let tracker = HabitTracker::open(dir.path()).expect("Failed to open tracker");
        let service = tracker.service();
        let today = date(2024, 1, 15);

        // Configure two habits.
        let read = Habit::new("Read", "Read a chapter").unwrap();
        let run = Habit::new("Run", "Run 5k").unwrap();
        let read_id = read.id.clone();
        let run_id = run.id.clone();
        service.add_habit_to_user("default_user", read).await.unwrap();
        service.add_habit_to_user("default_user", run).await.unwrap();

        // One completion, one failure.
        service
            .record_habit_completion(today, &read_id, Some("finished ch. 4".to_string()))
            .await
            .unwrap();
        service
            .record_habit_failure(today, &run_id, None)
            .await
            .unwrap();

        let summary = service.get_daily_summary(today).await.unwrap().unwrap();
        assert_eq!(summary.total_habits, 2);
        assert_eq!(summary.completed_habits, 1);
        assert!((summary.completion_rate - 0.5).abs() < 1e-9);
        assert_eq!(summary.completion_value_counts.get("1"), Some(&1));
        assert_eq!(summary.completion_value_counts.get("-1"), Some(&1));

        // The failed habit can still be corrected through the
        // unconstrained path.
        service
            .record_habit_entry(today, &run_id, Some(5), None)
            .await
            .unwrap();
        let summary = service.get_daily_summary(today).await.unwrap().unwrap();
        assert_eq!(summary.completed_habits, 2);

        // Cleanup of the configuration.
        assert!(service
            .remove_habit_from_user("default_user", "Run")
            .await
            .unwrap());
        let habits = service.get_user_habits("default_user").await.unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].title, "Read");
    }

    #[tokio::test]
    async fn test_constrained_recording_is_one_way() {
        let dir = tempdir().expect("Failed to create temp dir");
        let tracker = HabitTracker::open(dir.path()).expect("Failed to open tracker");
        let service = tracker.service();
        let today = date(2024, 1, 15);

        service
            .record_habit_failure(today, "habit-1", None)
            .await
            .unwrap();

        // A completed recording after a failure is refused; the failure
        // stays in place.
        let err = service
            .record_habit_completion(today, "habit-1", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::AlreadyRecorded { ref status, .. } if status == "failed"
        ));

        let entry = service
            .get_habit_entry(today, "habit-1")
            .await
            .unwrap()
            .unwrap();
        assert!(entry.is_failed());

        // The legacy wrapper, however, may overwrite the failure.
        let (entry, was_already) = service
            .complete_habit_if_not_already(today, "habit-1", Some(1), None)
            .await
            .unwrap();
        assert!(!was_already);
        assert!(entry.is_completed());
    }

    #[tokio::test]
    async fn test_streak_across_month_boundary() {
        let dir = tempdir().expect("Failed to create temp dir");
        let tracker = HabitTracker::open(dir.path()).expect("Failed to open tracker");
        let service = tracker.service();

        // Leap February into March.
        for d in [
            date(2024, 2, 28),
            date(2024, 2, 29),
            date(2024, 3, 1),
            date(2024, 3, 2),
        ] {
            service
                .record_habit_completion(d, "habit-1", None)
                .await
                .unwrap();
        }

        let streak = service
            .get_habit_streak("habit-1", date(2024, 3, 2), DEFAULT_STREAK_LOOKBACK_DAYS)
            .await
            .unwrap();
        assert_eq!(streak, 4);
    }

    #[tokio::test]
    async fn test_data_survives_reopening() {
        let dir = tempdir().expect("Failed to create temp dir");
        let today = date(2024, 1, 15);

        {
            let tracker = HabitTracker::open(dir.path()).expect("Failed to open tracker");
            tracker
                .service()
                .add_habit_to_user("default_user", Habit::new("Read", "A chapter").unwrap())
                .await
                .unwrap();
            tracker
                .service()
                .record_habit_completion(today, "habit-1", None)
                .await
                .unwrap();
        }

        // A second tracker over the same directory sees everything the
        // first one persisted.
        let tracker = HabitTracker::open(dir.path()).expect("Failed to reopen tracker");
        let habits = tracker
            .service()
            .get_user_habits("default_user")
            .await
            .unwrap();
        assert_eq!(habits.len(), 1);

        let entry = tracker
            .service()
            .get_habit_entry(today, "habit-1")
            .await
            .unwrap()
            .unwrap();
        assert!(entry.is_completed());
    }

    #[tokio::test]
    async fn test_legacy_documents_load() {
        let dir = tempdir().expect("Failed to create temp dir");

        // Documents written by earlier versions carry both legacy fields;
        // some older records have only one of them, or a blank habit id.
        let days_dir = dir.path().join("days");
        std::fs::create_dir_all(&days_dir).unwrap();
        std::fs::write(
            days_dir.join("days.json"),
            r#"{
              "2024-01-15": {
                "date": "2024-01-15",
                "habit_entries": [
                  {"habit_id": "h1", "completion_value": 1, "status": "completed",
                   "notes": null, "completed_at": null},
                  {"habit_id": "h2", "status": "failed"},
                  {"habit_id": "h3", "completion_value": 0}
                ]
              }
            }"#,
        )
        .unwrap();

        let configs_dir = dir.path().join("configs");
        std::fs::create_dir_all(&configs_dir).unwrap();
        std::fs::write(
            configs_dir.join("user_configs.json"),
            r#"{
              "default_user": {
                "user_id": "default_user",
                "habits": [
                  {"id": "h1", "title": "Read", "description": "A chapter"},
                  {"title": "Run", "description": "5k"}
                ]
              }
            }"#,
        )
        .unwrap();

        let tracker = HabitTracker::open(dir.path()).expect("Failed to open tracker");
        let service = tracker.service();
        let today = date(2024, 1, 15);

        let summary = service.get_daily_summary(today).await.unwrap().unwrap();
        assert_eq!(summary.total_habits, 3);
        // h1 (value 1) and h3 (value 0, non-negative) count as completed.
        assert_eq!(summary.completed_habits, 2);

        let failed = service.get_habit_entry(today, "h2").await.unwrap().unwrap();
        assert!(failed.is_failed());
        assert_eq!(failed.completion_value(), Some(-1));

        // The habit stored without an id gets one on load.
        let habits = service.get_user_habits("default_user").await.unwrap();
        assert_eq!(habits.len(), 2);
        assert!(habits.iter().all(|h| !h.id.is_empty()));
    }

    #[tokio::test]
    async fn test_duplicate_titles_collapse_to_first() {
        let dir = tempdir().expect("Failed to create temp dir");
        let tracker = HabitTracker::open(dir.path()).expect("Failed to open tracker");
        let service = tracker.service();

        let first = Habit::new("Read", "Read a chapter").unwrap();
        let first_id = first.id.clone();
        service.add_habit_to_user("default_user", first).await.unwrap();
        service
            .add_habit_to_user("default_user", Habit::new("Read", "Other").unwrap())
            .await
            .unwrap();

        let habits = service.get_user_habits("default_user").await.unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].id, first_id);
    }
}
