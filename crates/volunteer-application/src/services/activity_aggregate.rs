//! Activity aggregate
//!
//! Owns the in-memory snapshot of one activity (the activity itself, its
//! tasks, per-task assignee sets and the assignable roster) for the screen
//! or session that loaded it. Every mutation goes to the collaborator
//! first, is committed to the snapshot second, and is followed by a
//! recompute of status and progress before the call returns.
//!
//! ```text
//!   new() ──► Loading ──load() ok──► Ready ──mutations──► Ready
//!                │                     │
//!                └──load() err──► Error ◄┘ (load() again)
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use volunteer_domain::entities::{Activity, Actor, CreatorSnapshot, Task, UserSummary};
use volunteer_domain::errors::DomainError;
use volunteer_domain::services::{
    ActivityPermissions, AssignmentDiff, AssignmentReconciler, PermissionPolicy,
    ProgressCalculator, TaskPermissions,
};
use volunteer_domain::value_objects::{ActivityId, ActivityStatus, Progress, TaskId, TaskStatus, UserId};

use super::assignment_batch::AssignmentBatch;
use crate::dto::{ActivityView, CreateTaskCommand, EditTaskCommand, TaskView};
use crate::errors::{ApplicationError, ApplicationResult};
use crate::events::{ApplicationEvent, EventPublisher};
use crate::ports::{ActivityGateway, Clock};

/// Lifecycle of the aggregate itself
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateState {
    Loading,
    Ready,
    /// Hydration failed; stays here until the next `load()`
    Error(ApplicationError),
}

/// What caused a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Load,
    TaskChange,
    RosterChange,
    Override,
}

struct Snapshot {
    activity: Activity,
    tasks: Vec<Task>,
    assignees: HashMap<TaskId, BTreeSet<UserId>>,
    roster: Vec<UserSummary>,
    roster_from_directory: bool,
}

pub struct ActivityAggregate<G, E>
where
    G: ActivityGateway,
    E: EventPublisher,
{
    gateway: Arc<G>,
    events: Arc<E>,
    clock: Arc<dyn Clock>,
    actor: Actor,
    activity_id: ActivityId,

    state: AggregateState,
    activity: Option<Activity>,
    tasks: Vec<Task>,
    assignees: HashMap<TaskId, BTreeSet<UserId>>,
    roster: Vec<UserSummary>,
    roster_from_directory: bool,

    status: ActivityStatus,
    progress: Progress,
    /// One-shot manual value, cleared by the next task change or reload
    manual_progress: Option<Progress>,
}

impl<G, E> ActivityAggregate<G, E>
where
    G: ActivityGateway,
    E: EventPublisher,
{
    /// Create an empty aggregate in the `Loading` state. Call [`load`](Self::load) next.
    pub fn new(
        activity_id: ActivityId,
        actor: Actor,
        gateway: Arc<G>,
        events: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            events,
            clock,
            actor,
            activity_id,
            state: AggregateState::Loading,
            activity: None,
            tasks: Vec::new(),
            assignees: HashMap::new(),
            roster: Vec::new(),
            roster_from_directory: false,
            status: ActivityStatus::Upcoming,
            progress: Progress::ZERO,
            manual_progress: None,
        }
    }

    // === Hydration ===

    /// Hydrate from the collaborator, replacing the whole snapshot.
    ///
    /// Also the retry path out of `Error`. A manual progress override does
    /// not survive a reload.
    pub async fn load(&mut self) -> ApplicationResult<()> {
        self.state = AggregateState::Loading;

        match self.hydrate().await {
            Ok(snapshot) => {
                self.activity = Some(snapshot.activity);
                self.tasks = snapshot.tasks;
                self.assignees = snapshot.assignees;
                self.roster = snapshot.roster;
                self.roster_from_directory = snapshot.roster_from_directory;
                self.manual_progress = None;
                self.settle(Trigger::Load).await;
                self.state = AggregateState::Ready;

                info!(
                    activity_id = %self.activity_id,
                    tasks = self.tasks.len(),
                    status = %self.status.as_str(),
                    progress = %self.progress,
                    "Activity loaded"
                );
                self.events
                    .publish(ApplicationEvent::ActivityLoaded {
                        activity_id: self.activity_id,
                        task_count: self.tasks.len(),
                        timestamp: self.clock.now(),
                    })
                    .await;
                Ok(())
            }
            Err(err) => {
                warn!(activity_id = %self.activity_id, error = %err, "Failed to load activity");
                self.activity = None;
                self.tasks.clear();
                self.assignees.clear();
                self.roster.clear();
                self.manual_progress = None;
                self.state = AggregateState::Error(err.clone());
                Err(err)
            }
        }
    }

    async fn hydrate(&self) -> ApplicationResult<Snapshot> {
        let activity = self.gateway.fetch_activity(self.activity_id).await?;
        let tasks = self.gateway.list_tasks(self.activity_id).await?;

        let lists = try_join_all(
            tasks
                .iter()
                .map(|task| self.gateway.list_assignments(task.id())),
        )
        .await?;
        let assignees: HashMap<TaskId, BTreeSet<UserId>> = tasks
            .iter()
            .map(Task::id)
            .zip(lists)
            .map(|(id, list)| (id, list.into_iter().map(|a| a.user_id).collect()))
            .collect();

        let roster_from_directory =
            self.actor.is_admin() || activity.created_by() == self.actor.id();
        let roster = if roster_from_directory {
            self.gateway
                .list_users()
                .await?
                .into_iter()
                .filter(|user| user.is_active)
                .collect()
        } else {
            activity
                .participants()
                .iter()
                .map(|p| UserSummary {
                    id: p.user_id,
                    name: p.name.clone(),
                    email: p.email.clone(),
                    is_active: true,
                    is_admin: false,
                })
                .collect()
        };

        Ok(Snapshot {
            activity,
            tasks,
            assignees,
            roster,
            roster_from_directory,
        })
    }

    // === Recompute ===

    /// Re-derive status and progress from the committed snapshot
    async fn settle(&mut self, trigger: Trigger) {
        let Some(activity) = self.activity.as_ref() else {
            return;
        };
        let previous = self.status;
        let now = self.clock.now();

        let lifecycle = ProgressCalculator::derive(
            activity.start_date(),
            activity.end_date(),
            &self.tasks,
            now,
        );

        if trigger == Trigger::TaskChange || lifecycle.status != ActivityStatus::Ongoing {
            self.manual_progress = None;
        }

        let mut status = lifecycle.status;
        let mut promoted = lifecycle.promoted;
        let progress = match self.manual_progress {
            Some(manual) => {
                if manual.is_complete() && !self.tasks.is_empty() {
                    status = ActivityStatus::Completed;
                    promoted = true;
                }
                manual
            }
            None => lifecycle.progress,
        };

        self.status = status;
        self.progress = progress;
        debug!(
            activity_id = %self.activity_id,
            status = %status.as_str(),
            progress = %progress,
            manual = self.manual_progress.is_some(),
            "Recomputed activity lifecycle"
        );

        if promoted && trigger != Trigger::Load && previous != ActivityStatus::Completed {
            info!(activity_id = %self.activity_id, "Activity completed");
            self.events
                .publish(ApplicationEvent::ActivityCompleted {
                    activity_id: self.activity_id,
                    timestamp: now,
                })
                .await;
        }
    }

    fn ready_activity(&self) -> ApplicationResult<&Activity> {
        match (&self.state, self.activity.as_ref()) {
            (AggregateState::Ready, Some(activity)) => Ok(activity),
            (AggregateState::Error(_), _) => Err(ApplicationError::OperationNotAllowed(
                "Activity failed to load; reload it first".into(),
            )),
            _ => Err(ApplicationError::OperationNotAllowed(
                "Activity is not loaded yet".into(),
            )),
        }
    }

    fn ready_task(&self, task_id: TaskId) -> ApplicationResult<&Task> {
        self.ready_activity()?;
        self.task(task_id)
            .ok_or_else(|| ApplicationError::NotFound(format!("task {}", task_id)))
    }

    /// Fold a write reply into the local copy; the creator snapshot stays pinned
    fn replace_task(&mut self, stored: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id() == stored.id()) {
            slot.refresh_from(stored);
        }
    }

    /// Drop a task the collaborator no longer knows about
    async fn task_call_failed(&mut self, task_id: TaskId, err: DomainError) -> ApplicationError {
        if matches!(err, DomainError::EntityNotFound { .. }) {
            debug!(task_id = %task_id, "Task is gone upstream, dropping it");
            self.tasks.retain(|t| t.id() != task_id);
            self.assignees.remove(&task_id);
            self.settle(Trigger::TaskChange).await;
        }
        err.into()
    }

    // === Task use cases ===

    /// Create a task, then assign any initial assignees.
    ///
    /// If the task is created but some assignments fail, the error is
    /// `PartialBatchFailure` carrying the new task's id.
    pub async fn add_task(&mut self, cmd: CreateTaskCommand) -> ApplicationResult<TaskId> {
        let activity = self.ready_activity()?;
        if !PermissionPolicy::can_add_task(&self.actor, activity) {
            return Err(ApplicationError::PermissionDenied(format!(
                "add a task to activity {}",
                self.activity_id
            )));
        }

        let mut draft = cmd.task;
        let (title, _) = draft.validate()?;
        draft.title = title;

        let creator = CreatorSnapshot::new(self.actor.id(), self.actor.is_admin());
        let task = self
            .gateway
            .create_task(self.activity_id, &draft, creator)
            .await?;
        let task_id = task.id();

        self.tasks.push(task);
        self.assignees.insert(task_id, BTreeSet::new());
        self.settle(Trigger::TaskChange).await;

        info!(activity_id = %self.activity_id, task_id = %task_id, "Task added");
        self.events
            .publish(ApplicationEvent::TaskAdded {
                activity_id: self.activity_id,
                task_id,
                timestamp: self.clock.now(),
            })
            .await;

        if !cmd.assignees.is_empty() {
            self.set_assignees(task_id, cmd.assignees).await?;
        }
        Ok(task_id)
    }

    /// Replace a task's editable fields, then reconcile assignees if given
    pub async fn edit_task(&mut self, task_id: TaskId, cmd: EditTaskCommand) -> ApplicationResult<()> {
        let task = self.ready_task(task_id)?;
        if !PermissionPolicy::can_edit_task(&self.actor, task) {
            return Err(ApplicationError::PermissionDenied(format!("edit task {}", task_id)));
        }

        let mut updated = task.clone();
        updated.apply_draft(cmd.task)?;

        let stored = match self.gateway.update_task(&updated).await {
            Ok(stored) => stored,
            Err(err) => return Err(self.task_call_failed(task_id, err).await),
        };
        self.replace_task(stored);
        self.settle(Trigger::TaskChange).await;

        info!(activity_id = %self.activity_id, task_id = %task_id, "Task updated");
        self.events
            .publish(ApplicationEvent::TaskUpdated {
                activity_id: self.activity_id,
                task_id,
                timestamp: self.clock.now(),
            })
            .await;

        if let Some(assignees) = cmd.assignees {
            self.set_assignees(task_id, assignees).await?;
        }
        Ok(())
    }

    /// Move a task between pending, in progress and completed
    pub async fn set_task_status(&mut self, task_id: TaskId, status: TaskStatus) -> ApplicationResult<()> {
        let task = self.ready_task(task_id)?;
        if !PermissionPolicy::can_change_task_status(&self.actor, task) {
            return Err(ApplicationError::PermissionDenied(format!(
                "change the status of task {}",
                task_id
            )));
        }
        if task.status() == status {
            return Ok(());
        }

        let mut updated = task.clone();
        updated.set_status(status);

        let stored = match self.gateway.update_task(&updated).await {
            Ok(stored) => stored,
            Err(err) => return Err(self.task_call_failed(task_id, err).await),
        };
        self.replace_task(stored);
        self.settle(Trigger::TaskChange).await;

        info!(
            activity_id = %self.activity_id,
            task_id = %task_id,
            status = %status.as_str(),
            "Task status changed"
        );
        self.events
            .publish(ApplicationEvent::TaskUpdated {
                activity_id: self.activity_id,
                task_id,
                timestamp: self.clock.now(),
            })
            .await;
        Ok(())
    }

    /// Delete a task and invalidate only its assignee entry
    pub async fn delete_task(&mut self, task_id: TaskId) -> ApplicationResult<()> {
        let task = self.ready_task(task_id)?;
        if !PermissionPolicy::can_delete_task(&self.actor, task) {
            return Err(ApplicationError::PermissionDenied(format!("delete task {}", task_id)));
        }

        if let Err(err) = self.gateway.delete_task(task_id).await {
            return Err(self.task_call_failed(task_id, err).await);
        }
        self.tasks.retain(|t| t.id() != task_id);
        self.assignees.remove(&task_id);
        self.settle(Trigger::TaskChange).await;

        info!(activity_id = %self.activity_id, task_id = %task_id, "Task deleted");
        self.events
            .publish(ApplicationEvent::TaskDeleted {
                activity_id: self.activity_id,
                task_id,
                timestamp: self.clock.now(),
            })
            .await;
        Ok(())
    }

    /// Make the task's assignees equal to `desired`.
    ///
    /// The persisted set is snapshotted once, every add/remove is issued
    /// independently, and the assignment list is fetched again afterwards
    /// whatever happened. Returns the diff that was attempted.
    pub async fn set_assignees(
        &mut self,
        task_id: TaskId,
        desired: impl IntoIterator<Item = UserId>,
    ) -> ApplicationResult<AssignmentDiff> {
        let task = self.ready_task(task_id)?;
        if !PermissionPolicy::can_edit_task(&self.actor, task) {
            return Err(ApplicationError::PermissionDenied(format!(
                "change the assignees of task {}",
                task_id
            )));
        }

        let desired: BTreeSet<UserId> = desired.into_iter().collect();
        let persisted = match self.assignees.get(&task_id) {
            Some(set) => set.clone(),
            None => self.fetch_assignees(task_id).await?,
        };

        let diff = AssignmentReconciler::reconcile(&persisted, &desired);
        if diff.is_empty() {
            self.assignees.insert(task_id, persisted);
            return Ok(diff);
        }

        let outcome = AssignmentBatch::new(self.gateway.as_ref())
            .execute(task_id, &diff)
            .await;

        match self.fetch_assignees(task_id).await {
            Ok(current) => {
                self.assignees.insert(task_id, current);
            }
            Err(err) => {
                self.assignees.remove(&task_id);
                if outcome.is_clean() {
                    return Err(err);
                }
                warn!(task_id = %task_id, error = %err, "Failed to refresh assignees after batch");
            }
        }

        self.events
            .publish(ApplicationEvent::AssigneesReconciled {
                task_id,
                added: outcome.added.clone(),
                removed: outcome.removed.clone(),
                failed: outcome.failures.len(),
                timestamp: self.clock.now(),
            })
            .await;

        if !outcome.is_clean() {
            return Err(ApplicationError::PartialBatchFailure {
                task_id,
                failures: outcome.failures,
            });
        }

        info!(
            task_id = %task_id,
            added = diff.to_add.len(),
            removed = diff.to_remove.len(),
            "Assignees reconciled"
        );
        Ok(diff)
    }

    async fn fetch_assignees(&self, task_id: TaskId) -> ApplicationResult<BTreeSet<UserId>> {
        let list = self.gateway.list_assignments(task_id).await?;
        Ok(list.into_iter().map(|a| a.user_id).collect())
    }

    // === Participation ===

    pub async fn join(&mut self) -> ApplicationResult<()> {
        let activity = self.ready_activity()?;
        if self.actor.is_admin() {
            return Err(ApplicationError::PermissionDenied(
                "administrators do not join activities".into(),
            ));
        }
        if !activity.is_public() {
            return Err(ApplicationError::PermissionDenied(format!(
                "activity {} is not public",
                self.activity_id
            )));
        }
        if activity.has_participant(self.actor.id()) {
            return Err(ApplicationError::OperationNotAllowed(
                "You already joined this activity".into(),
            ));
        }
        if activity.is_full() {
            return Err(ApplicationError::OperationNotAllowed(
                "This activity is full".into(),
            ));
        }

        let participant = self
            .gateway
            .join_activity(self.activity_id, self.actor.id())
            .await?;

        if !self.roster_from_directory && !self.roster.iter().any(|u| u.id == participant.user_id) {
            self.roster.push(UserSummary {
                id: participant.user_id,
                name: participant.name.clone(),
                email: participant.email.clone(),
                is_active: true,
                is_admin: false,
            });
        }
        if let Some(activity) = self.activity.as_mut() {
            activity.add_participant(participant);
        }
        self.settle(Trigger::RosterChange).await;

        info!(activity_id = %self.activity_id, user_id = %self.actor.id(), "Joined activity");
        self.events
            .publish(ApplicationEvent::ActivityJoined {
                activity_id: self.activity_id,
                user_id: self.actor.id(),
                timestamp: self.clock.now(),
            })
            .await;
        Ok(())
    }

    /// Leave the activity. `confirmed` must be true; rejoining is the only undo.
    pub async fn leave(&mut self, confirmed: bool) -> ApplicationResult<()> {
        let activity = self.ready_activity()?;
        if !PermissionPolicy::can_leave(&self.actor, activity) {
            return Err(ApplicationError::OperationNotAllowed(
                "You are not a participant of this activity".into(),
            ));
        }
        if !confirmed {
            return Err(ApplicationError::OperationNotAllowed(
                "Leaving an activity must be confirmed".into(),
            ));
        }

        let user_id = self.actor.id();
        self.gateway.leave_activity(self.activity_id, user_id).await?;

        if let Some(activity) = self.activity.as_mut() {
            activity.remove_participant(user_id);
        }
        if !self.roster_from_directory {
            self.roster.retain(|u| u.id != user_id);
        }
        self.settle(Trigger::RosterChange).await;

        info!(activity_id = %self.activity_id, user_id = %user_id, "Left activity");
        self.events
            .publish(ApplicationEvent::ActivityLeft {
                activity_id: self.activity_id,
                user_id,
                timestamp: self.clock.now(),
            })
            .await;
        Ok(())
    }

    // === Progress ===

    /// Set progress by hand while the activity is ongoing.
    ///
    /// The value is saved upstream first and holds locally until a task
    /// changes or the activity is reloaded. Setting 100 on an activity with
    /// tasks promotes it to completed.
    pub async fn set_progress(&mut self, value: i64) -> ApplicationResult<Progress> {
        let activity = self.ready_activity()?;
        let progress = Progress::try_from_percent(value)?;
        if self.status != ActivityStatus::Ongoing {
            return Err(ApplicationError::OperationNotAllowed(format!(
                "Progress can only be set while the activity is ongoing (it is {})",
                self.status.as_str()
            )));
        }
        if !PermissionPolicy::can_edit_activity(&self.actor, activity) {
            return Err(ApplicationError::PermissionDenied(format!(
                "set progress on activity {}",
                self.activity_id
            )));
        }

        self.gateway.save_progress(self.activity_id, progress).await?;
        self.manual_progress = Some(progress);
        self.settle(Trigger::Override).await;

        info!(activity_id = %self.activity_id, progress = %progress, "Progress overridden");
        self.events
            .publish(ApplicationEvent::ProgressOverridden {
                activity_id: self.activity_id,
                progress,
                timestamp: self.clock.now(),
            })
            .await;
        Ok(progress)
    }

    // === Accessors ===

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == AggregateState::Ready
    }

    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    /// Cached assignees, sorted ascending. `None` if the entry was invalidated.
    pub fn assignees(&self, task_id: TaskId) -> Option<Vec<UserId>> {
        self.assignees
            .get(&task_id)
            .map(|set| set.iter().copied().collect())
    }

    /// Users who may be picked as assignees
    pub fn roster(&self) -> &[UserSummary] {
        &self.roster
    }

    pub fn status(&self) -> ActivityStatus {
        self.status
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_progress_overridden(&self) -> bool {
        self.manual_progress.is_some()
    }

    pub fn is_joined(&self) -> bool {
        self.activity
            .as_ref()
            .is_some_and(|a| a.has_participant(self.actor.id()))
    }

    pub fn permissions(&self) -> Option<ActivityPermissions> {
        self.activity
            .as_ref()
            .map(|a| PermissionPolicy::for_activity(&self.actor, a, self.status))
    }

    pub fn task_permissions(&self, task_id: TaskId) -> Option<TaskPermissions> {
        self.task(task_id)
            .map(|t| PermissionPolicy::for_task(&self.actor, t))
    }

    /// Read model for the current snapshot
    pub fn view(&self) -> Option<ActivityView> {
        let activity = self.activity.as_ref()?;
        Some(ActivityView {
            id: activity.id(),
            title: activity.title().to_string(),
            organization_name: activity.organization_name().to_string(),
            start_date: activity.start_date(),
            end_date: activity.end_date(),
            status: self.status,
            progress: self.progress,
            progress_overridden: self.manual_progress.is_some(),
            is_public: activity.is_public(),
            is_joined: activity.has_participant(self.actor.id()),
            participant_count: activity.participant_count(),
            max_participants: activity.max_participants(),
            permissions: PermissionPolicy::for_activity(&self.actor, activity, self.status),
            tasks: self
                .tasks
                .iter()
                .map(|t| {
                    TaskView::from_domain(
                        t,
                        self.assignees(t.id()).unwrap_or_default(),
                        &self.actor,
                    )
                })
                .collect(),
        })
    }
}
