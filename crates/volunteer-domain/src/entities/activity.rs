//! Activity entity
//!
//! Holds the display metadata, the temporal window and the participant
//! roster. Status and progress are never stored here; they are derived
//! from the window and the task list by the domain services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ActivityId, UserId};

/// A user who joined an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// Community volunteer activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    title: String,
    description: String,
    category: String,
    organization_name: String,
    location: String,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    is_public: bool,
    /// Immutable owner
    created_by: UserId,
    participant_count: u32,
    max_participants: Option<u32>,
    participants: Vec<Participant>,
}

impl Activity {
    /// Create an activity with only its identity and owner set
    pub fn new(id: ActivityId, title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            organization_name: String::new(),
            location: String::new(),
            start_date: None,
            end_date: None,
            is_public: false,
            created_by,
            participant_count: 0,
            max_participants: None,
            participants: Vec::new(),
        }
    }

    pub fn with_details(
        mut self,
        description: impl Into<String>,
        category: impl Into<String>,
        organization_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.category = category.into();
        self.organization_name = organization_name.into();
        self.location = location.into();
        self
    }

    pub fn with_window(
        mut self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_capacity(mut self, max_participants: Option<u32>) -> Self {
        self.max_participants = max_participants;
        self
    }

    /// Set the roster. The count is raised to at least the roster length,
    /// since the API may report a count for participants it does not list.
    pub fn with_participants(mut self, participants: Vec<Participant>, reported_count: u32) -> Self {
        self.participant_count = reported_count.max(participants.len() as u32);
        self.participants = participants;
        self
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn participant_count(&self) -> u32 {
        self.participant_count
    }

    pub fn max_participants(&self) -> Option<u32> {
        self.max_participants
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.participant_count >= max)
    }

    /// Add a participant. Returns false if they were already on the roster.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        if self.has_participant(participant.user_id) {
            return false;
        }
        self.participants.push(participant);
        self.participant_count += 1;
        true
    }

    /// Remove a participant. Returns false if they were not on the roster.
    pub fn remove_participant(&mut self, user_id: UserId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.user_id != user_id);
        if self.participants.len() == before {
            return false;
        }
        self.participant_count = self.participant_count.saturating_sub(1);
        true
    }
}
