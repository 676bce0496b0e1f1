//! Day-cycle engine
//!
//! Closes one tracked day: computes the completion rate over the active task
//! list, produces an immutable history snapshot, and returns the reset task
//! list for the next cycle. The caller prepends the log (most-recent-first)
//! and replaces the live list with the reset one.

use crate::model::{HistoryLog, Task};
use chrono::{DateTime, Local};

/// Completion rate above which the judgment is the positive tier
const RATE_POSITIVE: u8 = 80;
/// Completion rate above which the judgment is the encouraging tier
const RATE_NEUTRAL: u8 = 50;

/// Result of closing a day
#[derive(Debug, Clone)]
pub struct DayClose {
    /// The archived snapshot for the closed day
    pub log: HistoryLog,
    /// The same tasks with progress zeroed for the next cycle
    pub reset_tasks: Vec<Task>,
}

/// Close the current day-cycle
///
/// Returns `None` for an empty task list: there is nothing worth archiving
/// for a vacuous day, and the caller's state stays untouched.
///
/// The returned log holds a deep, independent copy of `tasks`; later edits
/// to the live list never reach it. Each reset task keeps its `id`, `title`,
/// `goal`, `unit`, and `start_time`, with `completed` forced to zero and
/// `last_updated` set to `now`.
///
/// # Arguments
///
/// * `tasks` - The active task list
/// * `now` - The archival instant; supplies both the log date and the reset
///   timestamps, injectable for deterministic tests
///
/// # Examples
///
/// ```
/// use chrono::Local;
/// use elevate::day_cycle::end_day;
/// use elevate::model::Task;
///
/// let now = Local::now();
/// let mut task = Task::new("Read", 10, "pages", now);
/// task.completed = 8;
///
/// let close = end_day(&[task], now).expect("non-empty list closes");
/// assert_eq!(close.log.completion_rate, 80);
/// assert_eq!(close.reset_tasks[0].completed, 0);
/// ```
pub fn end_day(tasks: &[Task], now: DateTime<Local>) -> Option<DayClose> {
    if tasks.is_empty() {
        return None;
    }

    let rate = completion_rate(tasks);

    let log = HistoryLog {
        date: now.format("%Y-%m-%d").to_string(),
        tasks: tasks.to_vec(),
        completion_rate: rate,
        summary: None,
    };

    let timestamp = now.to_rfc3339();
    let reset_tasks = tasks
        .iter()
        .map(|t| Task {
            completed: 0,
            last_updated: timestamp.clone(),
            ..t.clone()
        })
        .collect();

    tracing::info!(
        "Day closed: {} tasks archived at {}% completion",
        log.tasks.len(),
        rate
    );

    Some(DayClose { log, reset_tasks })
}

/// Integer completion percent over a task list
///
/// `round(100 * Σcompleted / Σgoal)` with half-away-from-zero rounding, or
/// `0` when the summed goal is zero. Always within 0-100 when no task
/// overshoots its goal; clamped at 100 otherwise so the stored rate stays a
/// valid percent.
pub fn completion_rate(tasks: &[Task]) -> u8 {
    let total_goal: u64 = tasks.iter().map(|t| u64::from(t.goal)).sum();
    let total_done: u64 = tasks.iter().map(|t| u64::from(t.completed)).sum();

    if total_goal == 0 {
        return 0;
    }

    let rate = (100.0 * total_done as f64 / total_goal as f64).round();
    rate.min(100.0) as u8
}

/// Judgment tier text for a completion rate
///
/// Thresholds are fixed product heuristics: above 80 is positive, above 50
/// is encouraging, anything else is corrective.
pub fn judgment(rate: u8) -> &'static str {
    if rate > RATE_POSITIVE {
        "Excellent work!"
    } else if rate > RATE_NEUTRAL {
        "Solid effort, but we can do better."
    } else {
        "We need to step it up tomorrow."
    }
}

/// Full end-of-day judgment message for the chat transcript
pub fn judgment_message(rate: u8) -> String {
    format!("Ending the day with {}% completion. {}", rate, judgment(rate))
}
