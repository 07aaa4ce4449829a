//! Task view model
//!
//! Pure functions of (snapshot, identity, filter selections). The
//! presentation layer recomputes these whenever a snapshot is replaced.

pub mod board;
pub mod draft;
pub mod media;
pub mod preview;
pub mod tasks;

pub use board::{board_for, AdminBoard, Board, StaffRow, WorkerBoard};
pub use draft::{DraftError, StaffDraft, TaskDraft};
pub use media::{attachment_url, resolve_file_url};
pub use preview::{ImagePreview, Point};
pub use tasks::{
    active_load, active_task, available_actions, badge_class, duration_label, format_elapsed,
    AttachmentGroups, Badge, TaskFilter, TaskStats,
};
