//! Application layer events
//!
//! Each event marks a completed use case on an activity aggregate and is
//! suitable for external consumers (notifications, audit logs, UI refresh).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use volunteer_domain::value_objects::{ActivityId, Progress, TaskId, UserId};

/// Application-level event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApplicationEvent {
    // === Activity Events ===

    /// Aggregate hydrated from the collaborator
    ActivityLoaded {
        activity_id: ActivityId,
        task_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Every task is done and the status was promoted to completed
    ActivityCompleted {
        activity_id: ActivityId,
        timestamp: DateTime<Utc>,
    },

    ActivityJoined {
        activity_id: ActivityId,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    },

    ActivityLeft {
        activity_id: ActivityId,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// Progress set by hand
    ProgressOverridden {
        activity_id: ActivityId,
        progress: Progress,
        timestamp: DateTime<Utc>,
    },

    // === Task Events ===

    TaskAdded {
        activity_id: ActivityId,
        task_id: TaskId,
        timestamp: DateTime<Utc>,
    },

    TaskUpdated {
        activity_id: ActivityId,
        task_id: TaskId,
        timestamp: DateTime<Utc>,
    },

    TaskDeleted {
        activity_id: ActivityId,
        task_id: TaskId,
        timestamp: DateTime<Utc>,
    },

    /// An assignment batch finished, possibly with failures
    AssigneesReconciled {
        task_id: TaskId,
        added: Vec<UserId>,
        removed: Vec<UserId>,
        failed: usize,
        timestamp: DateTime<Utc>,
    },
}

impl ApplicationEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ApplicationEvent::ActivityLoaded { .. } => "ActivityLoaded",
            ApplicationEvent::ActivityCompleted { .. } => "ActivityCompleted",
            ApplicationEvent::ActivityJoined { .. } => "ActivityJoined",
            ApplicationEvent::ActivityLeft { .. } => "ActivityLeft",
            ApplicationEvent::ProgressOverridden { .. } => "ProgressOverridden",
            ApplicationEvent::TaskAdded { .. } => "TaskAdded",
            ApplicationEvent::TaskUpdated { .. } => "TaskUpdated",
            ApplicationEvent::TaskDeleted { .. } => "TaskDeleted",
            ApplicationEvent::AssigneesReconciled { .. } => "AssigneesReconciled",
        }
    }

    /// Get the event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ApplicationEvent::ActivityLoaded { timestamp, .. }
            | ApplicationEvent::ActivityCompleted { timestamp, .. }
            | ApplicationEvent::ActivityJoined { timestamp, .. }
            | ApplicationEvent::ActivityLeft { timestamp, .. }
            | ApplicationEvent::ProgressOverridden { timestamp, .. }
            | ApplicationEvent::TaskAdded { timestamp, .. }
            | ApplicationEvent::TaskUpdated { timestamp, .. }
            | ApplicationEvent::TaskDeleted { timestamp, .. }
            | ApplicationEvent::AssigneesReconciled { timestamp, .. } => *timestamp,
        }
    }
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an application event
    async fn publish(&self, event: ApplicationEvent);
}

/// No-op event publisher
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ApplicationEvent) {}
}

/// In-memory event collector for testing
#[derive(Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<ApplicationEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<ApplicationEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Names of collected events, in order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(ApplicationEvent::event_type).collect()
    }

    /// Clear collected events
    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: ApplicationEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = ApplicationEvent::TaskAdded {
            activity_id: ActivityId::new(1),
            task_id: TaskId::new(2),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type(), "TaskAdded");
    }

    #[tokio::test]
    async fn test_in_memory_publisher() {
        let publisher = InMemoryEventPublisher::new();

        publisher
            .publish(ApplicationEvent::ActivityJoined {
                activity_id: ActivityId::new(1),
                user_id: UserId::new(3),
                timestamp: Utc::now(),
            })
            .await;

        assert_eq!(publisher.event_types(), vec!["ActivityJoined"]);
        publisher.clear();
        assert!(publisher.events().is_empty());
    }
}
