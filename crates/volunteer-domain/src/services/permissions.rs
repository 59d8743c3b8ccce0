//! Role-sensitive permission policy
//!
//! Delete is deliberately wider than edit for admins: an admin may remove
//! any task, but may only rewrite tasks whose creator was an admin.

use serde::{Deserialize, Serialize};

use crate::entities::{Activity, Actor, Task};
use crate::value_objects::ActivityStatus;

/// Task-level decisions for one actor, as shown next to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPermissions {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_change_status: bool,
}

/// Activity-level decisions for one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPermissions {
    pub can_edit: bool,
    pub can_add_task: bool,
    pub can_join: bool,
    pub can_leave: bool,
    pub can_set_progress: bool,
}

pub struct PermissionPolicy;

impl PermissionPolicy {
    /// Admin, the activity creator, or a participant. Status does not gate this.
    pub fn can_add_task(actor: &Actor, activity: &Activity) -> bool {
        actor.is_admin()
            || activity.created_by() == actor.id()
            || activity.has_participant(actor.id())
    }

    /// Admin-authored tasks are editable by any current admin only; all
    /// other tasks by their creator only.
    pub fn can_edit_task(actor: &Actor, task: &Task) -> bool {
        if task.creator().was_admin() {
            actor.is_admin()
        } else {
            task.created_by() == actor.id()
        }
    }

    /// Admins may always delete. Otherwise only the creator of a task that
    /// was not authored by an admin.
    pub fn can_delete_task(actor: &Actor, task: &Task) -> bool {
        if actor.is_admin() {
            return true;
        }
        !task.creator().was_admin() && task.created_by() == actor.id()
    }

    /// Marking a task in progress or completed follows the edit rule
    pub fn can_change_task_status(actor: &Actor, task: &Task) -> bool {
        Self::can_edit_task(actor, task)
    }

    pub fn can_edit_activity(actor: &Actor, activity: &Activity) -> bool {
        actor.is_admin() || activity.created_by() == actor.id()
    }

    /// Only non-admins join, only public activities, only once, only while
    /// seats remain.
    pub fn can_join(actor: &Actor, activity: &Activity) -> bool {
        !actor.is_admin()
            && activity.is_public()
            && !activity.has_participant(actor.id())
            && !activity.is_full()
    }

    pub fn can_leave(actor: &Actor, activity: &Activity) -> bool {
        activity.has_participant(actor.id())
    }

    /// Manual progress is an editor action, and only while ongoing
    pub fn can_set_progress(actor: &Actor, activity: &Activity, status: ActivityStatus) -> bool {
        status == ActivityStatus::Ongoing && Self::can_edit_activity(actor, activity)
    }

    pub fn for_task(actor: &Actor, task: &Task) -> TaskPermissions {
        TaskPermissions {
            can_edit: Self::can_edit_task(actor, task),
            can_delete: Self::can_delete_task(actor, task),
            can_change_status: Self::can_change_task_status(actor, task),
        }
    }

    pub fn for_activity(
        actor: &Actor,
        activity: &Activity,
        status: ActivityStatus,
    ) -> ActivityPermissions {
        ActivityPermissions {
            can_edit: Self::can_edit_activity(actor, activity),
            can_add_task: Self::can_add_task(actor, activity),
            can_join: Self::can_join(actor, activity),
            can_leave: Self::can_leave(actor, activity),
            can_set_progress: Self::can_set_progress(actor, activity, status),
        }
    }
}
