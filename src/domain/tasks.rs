//! Task domain types
//!
//! Tasks assigned to staff members and the commands that create or edit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::attachments::{Attachment, PendingFiles};
use super::staff::StaffId;

pub type TaskId = i64;

/// Task status enum
///
/// Any status string the backend sends outside the known set decodes to
/// `Unknown` instead of failing the whole snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    #[default]
    Todo,
    Done,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// The recognized statuses, in workflow order.
    pub const KNOWN: [TaskStatus; 5] = [
        Self::Pending,
        Self::Todo,
        Self::Done,
        Self::Approved,
        Self::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Todo => "TODO",
            Self::Done => "DONE",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Statuses that put a task on a worker's plate.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Todo | Self::Rejected)
    }

    /// In flight and not yet approved; counts toward a staff member's load.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Todo | Self::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "TODO" => Ok(Self::Todo),
            "DONE" => Ok(Self::Done),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// State-entry timestamps; each is present only once that state was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskTimestamps {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pending_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub todo_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub done_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
}

/// Pre-formatted durations computed by the backend. Opaque to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationInfo {
    #[serde(default)]
    pub pending_to_todo: Option<String>,
    #[serde(default)]
    pub todo_to_done: Option<String>,
    #[serde(default)]
    pub done_to_approved: Option<String>,
    #[serde(default)]
    pub total_time: Option<String>,
}

/// Task entity as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "assigned_to", default)]
    pub assignee_id: Option<StaffId>,
    #[serde(rename = "assigned_to_name", default)]
    pub assignee_name: Option<String>,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub timestamps: TaskTimestamps,
    #[serde(default)]
    pub duration_info: DurationInfo,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Command for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub assignee_id: StaffId,
    pub status: TaskStatus,
    pub files: PendingFiles,
}

/// Command for a partial update of an existing task
///
/// Files listed here are added to the task; existing attachments are kept.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub assignee_id: StaffId,
    pub status: TaskStatus,
    pub files: PendingFiles,
}

/// A submitted task form
#[derive(Debug, Clone)]
pub enum TaskCommand {
    Create(CreateTask),
    Update(UpdateTask),
}

/// Status transitions exposed as backend actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Start,
    Complete,
    Approve,
    Reject,
}

impl TaskAction {
    /// Path segment of the action endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Start => "start task",
            Self::Complete => "complete task",
            Self::Approve => "approve task",
            Self::Reject => "reject task",
        }
    }

    /// Status the backend moves the task into.
    pub fn target_status(&self) -> TaskStatus {
        match self {
            Self::Start => TaskStatus::Todo,
            Self::Complete => TaskStatus::Done,
            Self::Approve => TaskStatus::Approved,
            Self::Reject => TaskStatus::Rejected,
        }
    }
}
