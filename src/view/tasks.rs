//! Pure derivations over a task snapshot.
//!
//! Nothing here mutates the snapshot; every projection borrows from it and
//! is recomputed from scratch whenever the snapshot is replaced.

use chrono::Duration;

use crate::domain::{Attachment, FileType, StaffId, Task, TaskAction, TaskStatus};

/// Display tag for a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Pending,
    Todo,
    Done,
    Approved,
    Rejected,
    Neutral,
}

impl Badge {
    pub fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => Self::Pending,
            TaskStatus::Todo => Self::Todo,
            TaskStatus::Done => Self::Done,
            TaskStatus::Approved => Self::Approved,
            TaskStatus::Rejected => Self::Rejected,
            TaskStatus::Unknown => Self::Neutral,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Pending => "badge-pending",
            Self::Todo => "badge-todo",
            Self::Done => "badge-done",
            Self::Approved => "badge-approved",
            Self::Rejected => "badge-rejected",
            Self::Neutral => "",
        }
    }
}

pub fn badge_class(status: TaskStatus) -> &'static str {
    Badge::for_status(status).class()
}

/// The single task a worker is expected to be on: the first TODO or
/// REJECTED task in snapshot order.
pub fn active_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.status.is_actionable())
}

/// Admin list filter. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub assignee: Option<StaffId>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let assignee_ok = self.assignee.map_or(true, |a| task.assignee_id == Some(a));
        let status_ok = self.status.map_or(true, |s| task.status == s);
        assignee_ok && status_ok
    }

    /// Order-preserving projection of the snapshot.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignee.is_none() && self.status.is_none()
    }
}

/// Aggregate counters over one snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub todo: usize,
    pub done: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Statuses outside the recognized set, so the buckets always add up.
    pub unknown: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::Done => stats.done += 1,
                TaskStatus::Approved => stats.approved += 1,
                TaskStatus::Rejected => stats.rejected += 1,
                TaskStatus::Unknown => stats.unknown += 1,
            }
            stats
        })
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::Todo => self.todo,
            TaskStatus::Done => self.done,
            TaskStatus::Approved => self.approved,
            TaskStatus::Rejected => self.rejected,
            TaskStatus::Unknown => self.unknown,
        }
    }

    pub fn bucket_sum(&self) -> usize {
        self.pending + self.todo + self.done + self.approved + self.rejected + self.unknown
    }
}

/// Tasks assigned to `staff_id` that are in flight (TODO or DONE).
pub fn active_load(tasks: &[Task], staff_id: StaffId) -> usize {
    tasks
        .iter()
        .filter(|t| t.assignee_id == Some(staff_id) && t.status.is_in_flight())
        .count()
}

/// Elapsed time from "moved to todo" to "done".
///
/// The backend's pre-computed string wins; otherwise it is derived from the
/// two timestamps when both are present.
pub fn duration_label(task: &Task) -> Option<String> {
    if let Some(label) = task.duration_info.todo_to_done.as_deref() {
        return Some(label.to_string());
    }
    let ts = &task.timestamps;
    match (ts.todo_at, ts.done_at) {
        (Some(todo), Some(done)) => Some(format_elapsed(done - todo)),
        _ => None,
    }
}

/// Format as "2d 3h 15m", leaving out zero parts; "<1m" under a minute.
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes_total = elapsed.num_minutes().max(0);
    let days = minutes_total / (24 * 60);
    let hours = (minutes_total / 60) % 24;
    let minutes = minutes_total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }

    if parts.is_empty() {
        "<1m".to_string()
    } else {
        parts.join(" ")
    }
}

/// Attachments split by media type, order preserved within each group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentGroups<'a> {
    pub images: Vec<&'a Attachment>,
    pub videos: Vec<&'a Attachment>,
    pub audios: Vec<&'a Attachment>,
}

impl<'a> AttachmentGroups<'a> {
    pub fn of(task: &'a Task) -> Self {
        let mut groups = Self::default();
        for attachment in &task.attachments {
            match attachment.file_type {
                FileType::Image => groups.images.push(attachment),
                FileType::Video => groups.videos.push(attachment),
                FileType::Audio => groups.audios.push(attachment),
            }
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty() && self.audios.is_empty()
    }
}

/// Transition controls to offer for a task.
///
/// This only decides what is shown; the backend remains the authority on
/// whether a transition is legal.
pub fn available_actions(task: &Task, privileged: bool) -> Vec<TaskAction> {
    match (task.status, privileged) {
        (TaskStatus::Pending, _) => vec![TaskAction::Start],
        (TaskStatus::Done, true) => vec![TaskAction::Approve, TaskAction::Reject],
        (TaskStatus::Todo | TaskStatus::Rejected, false) => vec![TaskAction::Complete],
        _ => Vec::new(),
    }
}
