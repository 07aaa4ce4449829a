//! Domain types and commands
//!
//! Wire shapes of the task-assignment backend plus the explicit command
//! types sent back to it.

pub mod attachments;
pub mod staff;
pub mod tasks;

// Re-export commonly used types
pub use attachments::*;
pub use staff::*;
pub use tasks::*;
