//! Scenario tests for volunteer-domain

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use volunteer_domain::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn yesterday() -> DateTime<Utc> {
    now() - Duration::days(1)
}

fn task(id: i64, status: TaskStatus) -> Task {
    Task::from_draft(
        TaskId::new(id),
        ActivityId::new(1),
        TaskDraft::titled(format!("task {id}")).with_status(status),
        CreatorSnapshot::new(UserId::new(2), false),
    )
    .unwrap()
}

mod lifecycle_scenarios {
    use super::*;

    #[test]
    fn test_open_ended_activity_two_of_three_tasks() {
        let tasks = vec![
            task(1, TaskStatus::Completed),
            task(2, TaskStatus::Completed),
            task(3, TaskStatus::InProgress),
        ];
        assert_eq!(
            StatusResolver::resolve(Some(yesterday()), None, now()),
            ActivityStatus::Ongoing
        );
        let lifecycle = ProgressCalculator::derive(Some(yesterday()), None, &tasks, now());
        assert_eq!(lifecycle.status, ActivityStatus::Ongoing);
        assert_eq!(lifecycle.progress.value(), 67);
    }

    #[test]
    fn test_future_activity_without_tasks() {
        let tomorrow = now() + Duration::days(1);
        let lifecycle = ProgressCalculator::derive(Some(tomorrow), None, &[], now());
        assert_eq!(lifecycle.status, ActivityStatus::Upcoming);
        assert_eq!(lifecycle.progress, Progress::ZERO);
    }

    #[test]
    fn test_finished_activity_without_tasks() {
        let last_week = now() - Duration::days(7);
        let lifecycle = ProgressCalculator::derive(Some(last_week), Some(yesterday()), &[], now());
        assert_eq!(lifecycle.status, ActivityStatus::Completed);
        assert_eq!(lifecycle.progress, Progress::COMPLETE);
        assert!(!lifecycle.promoted);
    }

    #[test]
    fn test_ongoing_without_end_reports_midpoint() {
        let lifecycle = ProgressCalculator::derive(Some(yesterday()), None, &[], now());
        assert_eq!(lifecycle.progress, Progress::INDETERMINATE);
    }
}

mod permission_matrix {
    use super::*;

    #[test]
    fn test_matrix() {
        let admin = Actor::new(UserId::new(1), Some(0), None);
        let member = Actor::new(UserId::new(2), Some(1), Some("user"));

        let member_task = task(1, TaskStatus::Pending);
        let admin_task = Task::from_draft(
            TaskId::new(2),
            ActivityId::new(1),
            TaskDraft::titled("Safety briefing"),
            CreatorSnapshot::from_role(UserId::new(1), None, Some("admin")),
        )
        .unwrap();

        assert!(!PermissionPolicy::can_edit_task(&admin, &member_task));
        assert!(PermissionPolicy::can_delete_task(&admin, &member_task));

        assert!(PermissionPolicy::can_edit_task(&member, &member_task));
        assert!(PermissionPolicy::can_delete_task(&member, &member_task));

        assert!(!PermissionPolicy::can_edit_task(&member, &admin_task));
        assert!(!PermissionPolicy::can_delete_task(&member, &admin_task));
    }

    #[test]
    fn test_stranger_cannot_add_task_to_public_activity() {
        let activity = Activity::new(ActivityId::new(1), "Soup kitchen", UserId::new(9))
            .with_visibility(true);
        let stranger = Actor::member(UserId::new(4));
        assert!(!PermissionPolicy::can_add_task(&stranger, &activity));

        let view = PermissionPolicy::for_activity(&stranger, &activity, ActivityStatus::Ongoing);
        assert!(view.can_join);
        assert!(!view.can_leave);
        assert!(!view.can_edit);
    }
}

mod reconciliation {
    use super::*;

    #[test]
    fn test_documented_example() {
        let persisted: BTreeSet<UserId> = [1, 2, 3].into_iter().map(UserId::new).collect();
        let desired: BTreeSet<UserId> = [2, 3, 4].into_iter().map(UserId::new).collect();
        let diff = AssignmentReconciler::reconcile(&persisted, &desired);
        assert_eq!(diff.to_add, vec![UserId::new(4)]);
        assert_eq!(diff.to_remove, vec![UserId::new(1)]);
    }
}
