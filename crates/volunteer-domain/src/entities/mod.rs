//! Core domain entities
//!
//! - `activity`: Activity entity and its participant roster
//! - `task`: Task entity, creator snapshot and editable drafts
//! - `assignment`: Task/user assignment pair
//! - `user`: Actors performing actions and users listed in pickers

mod activity;
mod assignment;
mod task;
mod user;

pub use activity::*;
pub use assignment::*;
pub use task::*;
pub use user::*;
