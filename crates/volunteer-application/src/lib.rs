//! Volunteer Application Layer
//!
//! Orchestrates the activity/task engine on top of the domain rules. The
//! [`ActivityAggregate`] owns one activity's snapshot and drives every use
//! case against the collaborator ports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Application Layer                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Services          │ DTOs              │ Ports              │ Events    │
//! │  ─────────         │ ────              │ ─────              │ ──────    │
//! │  ActivityAggregate │ CreateTaskCommand │ ActivityRepository │ AppEvent  │
//! │  AssignmentBatch   │ EditTaskCommand   │ TaskRepository     │ Publisher │
//! │                    │ *Record           │ AssignmentRepo     │           │
//! │                    │ ActivityView      │ UserDirectory      │           │
//! │                    │ TaskView          │ Clock              │           │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ depends on
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Layer                                     │
//! │  Entities, Value Objects, Status/Progress/Permission/Reconcile rules   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Non-Goals
//!
//! - Domain rules (belong in `volunteer-domain`)
//! - Transport (belongs in `volunteer-http`)
//! - Retries: collaborator failures surface immediately

pub mod dto;
pub mod errors;
pub mod events;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use dto::*;
pub use errors::{ApplicationError, ApplicationResult, AssignmentOp, PairFailure};
pub use events::{ApplicationEvent, EventPublisher, InMemoryEventPublisher, NoOpEventPublisher};
pub use ports::{
    ActivityGateway, ActivityRepository, AssignmentRepository, Clock, FixedClock, SystemClock,
    TaskRepository, UserDirectory,
};
pub use services::*;
