/// Command line entry point for the habits tracker
///
/// A thin adapter over the habit tracking service: arguments are parsed,
/// date paths are translated through the date utility, and results are
/// printed. All domain rules live in the library.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use habits_tracker::{
    format_date_path, navigation_for, parse_date_path, AppError, Habit, HabitTracker,
    DEFAULT_STREAK_LOOKBACK_DAYS,
};

/// Command line arguments for the habits tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory where habit data is stored
    /// Must stay inside the working directory
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// User whose habits are managed
    #[arg(long, default_value = "default_user")]
    user: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a habit to the user's configuration
    Add { title: String, description: String },

    /// Remove a habit from the user's configuration by title
    Remove { title: String },

    /// List the user's configured habits
    List,

    /// Record a completion; refuses if the habit is already recorded
    Complete {
        habit: String,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Record a failure; refuses if the habit is already recorded
    Fail {
        habit: String,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Record an entry, overwriting whatever is there
    Log {
        habit: String,
        #[arg(long)]
        value: Option<i64>,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a habit completed unless it already is (a failure is overwritten)
    Done {
        habit: String,
        #[arg(long)]
        value: Option<i64>,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the entries recorded for a date
    Show {
        #[arg(default_value = "today")]
        date: String,
    },

    /// Current streak for a habit ending at a date
    Streak {
        habit: String,
        #[arg(default_value = "today")]
        date: String,
    },

    /// Completion summary for a date
    Summary {
        #[arg(default_value = "today")]
        date: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habits_tracker={}", log_level))
        .with_writer(std::io::stderr) // Keep stdout for command output
        .init();

    if let Err(err) = run(args).await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let tracker = HabitTracker::open(&args.data_dir)?;
    let service = tracker.service();
    info!(user = %args.user, "habits tracker started");

    match args.command {
        Command::Add { title, description } => {
            let habit = Habit::new(title, description)?;
            let habit_id = habit.id.clone();
            let title = habit.title.clone();
            let config = service.add_habit_to_user(&args.user, habit).await?;

            if config.habits.iter().any(|h| h.id == habit_id) {
                println!("Added habit '{}'", title);
            } else {
                println!("Habit '{}' already exists, nothing added", title);
            }
        }

        Command::Remove { title } => {
            if service.remove_habit_from_user(&args.user, &title).await? {
                println!("Removed habit '{}'", title);
            } else {
                println!("No habit titled '{}'", title);
            }
        }

        Command::List => {
            let habits = service.get_user_habits(&args.user).await?;
            if habits.is_empty() {
                println!("No habits configured");
            }
            for habit in habits {
                println!("{} - {} ({})", habit.title, habit.description, habit.id);
            }
        }

        Command::Complete { habit, date, notes } => {
            let date = parse_date_path(&date)?;
            let habit_id = resolve_habit_id(&tracker, &args.user, &habit).await?;
            service.record_habit_completion(date, &habit_id, notes).await?;
            println!("Recorded completion for '{}' on {}", habit, date);
        }

        Command::Fail { habit, date, notes } => {
            let date = parse_date_path(&date)?;
            let habit_id = resolve_habit_id(&tracker, &args.user, &habit).await?;
            service.record_habit_failure(date, &habit_id, notes).await?;
            println!("Recorded failure for '{}' on {}", habit, date);
        }

        Command::Log {
            habit,
            value,
            date,
            notes,
        } => {
            let date = parse_date_path(&date)?;
            let habit_id = resolve_habit_id(&tracker, &args.user, &habit).await?;
            let entry = service
                .record_habit_entry(date, &habit_id, value, notes)
                .await?;
            match entry.completion_value() {
                Some(value) => println!("Logged '{}' on {} with value {}", habit, date, value),
                None => println!("Logged '{}' on {} with no value", habit, date),
            }
        }

        Command::Done {
            habit,
            value,
            date,
            notes,
        } => {
            let date = parse_date_path(&date)?;
            let habit_id = resolve_habit_id(&tracker, &args.user, &habit).await?;
            let (_, was_already_completed) = service
                .complete_habit_if_not_already(date, &habit_id, value, notes)
                .await?;
            if was_already_completed {
                println!("'{}' was already completed on {}", habit, date);
            } else {
                println!("Completed '{}' on {}", habit, date);
            }
        }

        Command::Show { date } => {
            let date = parse_date_path(&date)?;
            let habits = service.get_user_habits(&args.user).await?;
            let days = service.get_habit_progress(date, date).await?;

            println!("Entries for {}:", format_date_path(date));
            match days.first() {
                None => println!("  (none recorded)"),
                Some(day) if day.habit_entries.is_empty() => println!("  (none recorded)"),
                Some(day) => {
                    for entry in &day.habit_entries {
                        let title = habits
                            .iter()
                            .find(|h| h.id == entry.habit_id)
                            .map(|h| h.title.as_str())
                            .unwrap_or(entry.habit_id.as_str());
                        let status = entry
                            .status()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "unrecorded".to_string());
                        match &entry.notes {
                            Some(notes) => println!("  {} - {} ({})", title, status, notes),
                            None => println!("  {} - {}", title, status),
                        }
                    }
                }
            }

            let nav = navigation_for(date);
            match nav.next_path {
                Some(next) => println!("prev: {}  next: {}", nav.prev_path, next),
                None => println!("prev: {}", nav.prev_path),
            }
        }

        Command::Streak { habit, date } => {
            let end_date = parse_date_path(&date)?;
            let habit_id = resolve_habit_id(&tracker, &args.user, &habit).await?;
            let streak = service
                .get_habit_streak(&habit_id, end_date, DEFAULT_STREAK_LOOKBACK_DAYS)
                .await?;
            println!(
                "{} day streak for '{}' ending {}",
                streak,
                habit,
                format_date_path(end_date)
            );
        }

        Command::Summary { date } => {
            let date = parse_date_path(&date)?;
            match service.get_daily_summary(date).await? {
                None => println!("No entries recorded for {}", format_date_path(date)),
                Some(summary) => {
                    println!("Summary for {}:", format_date_path(date));
                    println!(
                        "  {} of {} habits completed ({:.0}%)",
                        summary.completed_habits,
                        summary.total_habits,
                        summary.completion_rate * 100.0
                    );
                    for (value, count) in &summary.completion_value_counts {
                        println!("  value {}: {}", value, count);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Resolve a habit selector (title or id) to a habit id
///
/// Unknown selectors pass through unchanged so entries can be addressed by
/// raw id even when the habit is no longer configured.
async fn resolve_habit_id(
    tracker: &HabitTracker,
    user: &str,
    selector: &str,
) -> Result<String, AppError> {
    let habits = tracker.service().get_user_habits(user).await?;
    Ok(habits
        .iter()
        .find(|h| h.id == selector || h.title == selector)
        .map(|h| h.id.clone())
        .unwrap_or_else(|| selector.to_string()))
}
