//! Data Transfer Objects (DTOs) for layer boundary crossing
//!
//! - `records`: wire shapes consumed from and sent to the backing API
//! - `commands`: inputs for aggregate use cases
//! - `views`: read models handed to UI callers

pub mod commands;
pub mod records;
pub mod views;

pub use commands::*;
pub use records::*;
pub use views::*;
