//! Application layer services
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Services                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ActivityAggregate - Activity snapshot, task CRUD, roster    │
//! │  AssignmentBatch   - Best-effort add/remove of assignees     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain rules stay in `volunteer-domain`; these services only sequence
//! collaborator calls around them and publish events.

mod activity_aggregate;
mod assignment_batch;

pub use activity_aggregate::{ActivityAggregate, AggregateState};
pub use assignment_batch::{AssignmentBatch, BatchOutcome};
