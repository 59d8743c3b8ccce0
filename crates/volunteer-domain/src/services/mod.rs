//! Domain services - stateless business logic that doesn't belong to entities
//!
//! Every service here is a pure, synchronous computation over an in-memory
//! snapshot. None of them fail: bad inputs degrade to safe defaults.
//!
//! - `StatusResolver`: temporal status from a start/end window
//! - `ProgressCalculator`: task-based progress with a time-based fallback
//! - `PermissionPolicy`: who may create, edit or delete tasks and activities
//! - `AssignmentReconciler`: add/remove diff between assignee sets

mod permissions;
mod progress;
mod reconcile;
mod status;

pub use permissions::{ActivityPermissions, PermissionPolicy, TaskPermissions};
pub use progress::{Lifecycle, ProgressCalculator};
pub use reconcile::{AssignmentDiff, AssignmentReconciler};
pub use status::{parse_instant, StatusResolver};
