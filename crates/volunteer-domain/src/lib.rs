//! Volunteer activity domain
//!
//! Entities, value objects and the stateless rules of the activity/task
//! engine: temporal status, progress, permissions and assignment
//! reconciliation. Nothing in this crate performs I/O; collaborator ports
//! live in `volunteer-application`.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, DomainResult};
pub use services::*;
pub use value_objects::*;
