//! Progress calculation
//!
//! Task-based whenever the activity has at least one task, otherwise a
//! time-based estimate from the activity window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusResolver;
use crate::entities::Task;
use crate::value_objects::{ActivityStatus, Progress};

/// Derived status and progress for an activity at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub status: ActivityStatus,
    pub progress: Progress,
    /// Status was raised to `Completed` because every task is done
    pub promoted: bool,
}

pub struct ProgressCalculator;

impl ProgressCalculator {
    /// Percentage of completed tasks. Empty input yields zero.
    pub fn from_tasks(tasks: &[Task]) -> Progress {
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        Self::from_counts(completed, tasks.len())
    }

    /// `round(100 * completed / total)`.
    ///
    /// Exactly 100 iff every task is completed: an almost-done list that
    /// would round up stays at 99, so 100 always implies promotion.
    pub fn from_counts(completed: usize, total: usize) -> Progress {
        if total == 0 {
            return Progress::ZERO;
        }
        if completed >= total {
            return Progress::COMPLETE;
        }
        let pct = Progress::from_ratio_percent(100.0 * completed as f64 / total as f64);
        pct.min(Progress::new(99))
    }

    /// Time-based fallback for activities without tasks
    pub fn from_time(
        status: ActivityStatus,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Progress {
        match status {
            ActivityStatus::Completed => Progress::COMPLETE,
            ActivityStatus::Upcoming => Progress::ZERO,
            ActivityStatus::Ongoing => match (start_date, end_date) {
                (Some(start), Some(end)) => {
                    let span = (end - start).num_milliseconds();
                    if span <= 0 {
                        return Progress::COMPLETE;
                    }
                    let elapsed = (now - start).num_milliseconds();
                    Progress::from_ratio_percent(100.0 * elapsed as f64 / span as f64)
                }
                _ => Progress::INDETERMINATE,
            },
        }
    }

    /// Pick the algorithm by data availability
    pub fn calculate(
        tasks: &[Task],
        status: ActivityStatus,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Progress {
        if tasks.is_empty() {
            Self::from_time(status, start_date, end_date, now)
        } else {
            Self::from_tasks(tasks)
        }
    }

    /// Resolve status and progress together, promoting the status to
    /// `Completed` when every task is done. A status already resolved as
    /// `Completed` from the window is left as is.
    pub fn derive(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        tasks: &[Task],
        now: DateTime<Utc>,
    ) -> Lifecycle {
        let status = StatusResolver::resolve(start_date, end_date, now);
        let progress = Self::calculate(tasks, status, start_date, end_date, now);

        let promote =
            !tasks.is_empty() && progress.is_complete() && status != ActivityStatus::Completed;
        Lifecycle {
            status: if promote {
                ActivityStatus::Completed
            } else {
                status
            },
            progress,
            promoted: promote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CreatorSnapshot, TaskDraft};
    use crate::value_objects::{ActivityId, TaskId, TaskStatus, UserId};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn tasks(statuses: &[TaskStatus]) -> Vec<Task> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                Task::from_draft(
                    TaskId::new(i as i64 + 1),
                    ActivityId::new(1),
                    TaskDraft::titled(format!("task {i}")).with_status(*status),
                    CreatorSnapshot::new(UserId::new(1), false),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_two_of_three_rounds_to_67() {
        let list = tasks(&[TaskStatus::Completed, TaskStatus::Completed, TaskStatus::Pending]);
        assert_eq!(ProgressCalculator::from_tasks(&list).value(), 67);
    }

    #[test]
    fn test_empty_list_is_zero() {
        assert_eq!(ProgressCalculator::from_tasks(&[]).value(), 0);
    }

    #[test]
    fn test_all_completed_is_exactly_100() {
        let list = tasks(&[TaskStatus::Completed; 3]);
        assert_eq!(ProgressCalculator::from_tasks(&list), Progress::COMPLETE);
    }

    #[test]
    fn test_almost_done_never_reports_100() {
        assert_eq!(ProgressCalculator::from_counts(199, 200).value(), 99);
        assert_eq!(ProgressCalculator::from_counts(1, 200).value(), 1);
    }

    #[test]
    fn test_time_fallback() {
        let start = now() - Duration::days(1);
        let end = now() + Duration::days(3);
        assert_eq!(
            ProgressCalculator::from_time(ActivityStatus::Ongoing, Some(start), Some(end), now())
                .value(),
            25
        );
        assert_eq!(
            ProgressCalculator::from_time(ActivityStatus::Ongoing, Some(start), None, now()),
            Progress::INDETERMINATE
        );
        assert_eq!(
            ProgressCalculator::from_time(ActivityStatus::Upcoming, None, None, now()),
            Progress::ZERO
        );
        assert_eq!(
            ProgressCalculator::from_time(ActivityStatus::Completed, None, None, now()),
            Progress::COMPLETE
        );
    }

    #[test]
    fn test_time_fallback_clamps_inconsistent_inputs() {
        // status says ongoing but the window is already over
        let progress = ProgressCalculator::from_time(
            ActivityStatus::Ongoing,
            Some(now() - Duration::days(10)),
            Some(now() - Duration::days(5)),
            now(),
        );
        assert_eq!(progress, Progress::COMPLETE);

        let zero_span = ProgressCalculator::from_time(
            ActivityStatus::Ongoing,
            Some(now()),
            Some(now()),
            now(),
        );
        assert_eq!(zero_span, Progress::COMPLETE);
    }

    #[test]
    fn test_derive_promotes_when_all_done() {
        let list = tasks(&[TaskStatus::Completed, TaskStatus::Completed]);
        let lifecycle =
            ProgressCalculator::derive(Some(now() - Duration::days(1)), None, &list, now());
        assert_eq!(lifecycle.status, ActivityStatus::Completed);
        assert_eq!(lifecycle.progress, Progress::COMPLETE);
        assert!(lifecycle.promoted);
    }

    #[test]
    fn test_derive_keeps_time_completed_without_promotion() {
        let list = tasks(&[TaskStatus::Completed]);
        let lifecycle = ProgressCalculator::derive(
            Some(now() - Duration::days(7)),
            Some(now() - Duration::days(1)),
            &list,
            now(),
        );
        assert_eq!(lifecycle.status, ActivityStatus::Completed);
        assert!(!lifecycle.promoted);
    }

    #[test]
    fn test_derive_time_completed_with_open_tasks() {
        let list = tasks(&[TaskStatus::Completed, TaskStatus::InProgress]);
        let lifecycle = ProgressCalculator::derive(
            Some(now() - Duration::days(7)),
            Some(now() - Duration::days(1)),
            &list,
            now(),
        );
        assert_eq!(lifecycle.status, ActivityStatus::Completed);
        assert_eq!(lifecycle.progress.value(), 50);
    }
}
