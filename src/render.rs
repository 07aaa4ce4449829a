//! Plain-text rendering of boards for the command line.

use crate::domain::{StaffMember, Task, TaskStatus};
use crate::view::{
    attachment_url, available_actions, badge_class, duration_label, AdminBoard, AttachmentGroups,
    StaffRow, TaskStats, WorkerBoard,
};

pub fn admin_board(board: &AdminBoard<'_>, origin: &str) -> String {
    let mut lines = vec![stats_line(&board.stats), format!("Staff: {}", board.staff_count())];

    lines.push(String::new());
    if board.tasks.is_empty() {
        lines.push("No tasks match the current filter.".to_string());
    }
    for task in &board.tasks {
        lines.push(task_row(task));
    }

    lines.push(String::new());
    for row in &board.staff {
        lines.push(staff_row(row));
    }

    // Attachments for the filtered tasks, when any
    for task in board.tasks.iter().filter(|t| !t.attachments.is_empty()) {
        lines.push(String::new());
        lines.push(format!("#{} attachments:", task.id));
        lines.extend(attachment_lines(task, origin));
    }

    lines.join("\n")
}

pub fn worker_board(board: &WorkerBoard<'_>, origin: &str) -> String {
    let mut header = board.display_name.to_string();
    if let Some(phone) = board.phone_number {
        header.push_str(&format!(" ({phone})"));
    }

    let mut lines = vec![header, String::new()];
    match board.active {
        Some(task) => lines.push(task_details(task, origin, false)),
        None => lines.push("No active task.".to_string()),
    }
    lines.join("\n")
}

/// Full view of one task, including the actions the role may take.
pub fn task_details(task: &Task, origin: &str, privileged: bool) -> String {
    let mut lines = vec![
        format!("#{} {}", task.id, task.title),
        format!("Status: {} [{}]", task.status, badge_class(task.status)),
    ];
    if let Some(name) = &task.assignee_name {
        lines.push(format!("Assignee: {name}"));
    }
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push(task.description.clone());
    }
    if let Some(label) = duration_label(task) {
        lines.push(format!("Time to done: {label}"));
    }
    if let Some(total) = &task.duration_info.total_time {
        lines.push(format!("Total time: {total}"));
    }

    let attachments = attachment_lines(task, origin);
    if !attachments.is_empty() {
        lines.push(String::new());
        lines.extend(attachments);
    }

    let actions: Vec<_> = available_actions(task, privileged)
        .iter()
        .map(|a| a.path())
        .collect();
    if !actions.is_empty() {
        lines.push(String::new());
        lines.push(format!("Actions: {}", actions.join(", ")));
    }

    lines.join("\n")
}

pub fn staff_list(staff: &[StaffMember]) -> String {
    if staff.is_empty() {
        return "No staff members.".to_string();
    }
    staff
        .iter()
        .map(|member| {
            let mut line = format!("#{:<4} {}", member.id, member.full_name);
            let roles = member.roles.labels();
            if !roles.is_empty() {
                line.push_str(&format!(" ({})", roles.join(", ")));
            }
            if let Some(phone) = member.phone_number.as_deref().filter(|p| !p.is_empty()) {
                line.push_str(&format!("  {phone}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats_line(stats: &TaskStats) -> String {
    let mut parts = vec![format!("Total: {}", stats.total)];
    parts.extend(
        TaskStatus::KNOWN
            .iter()
            .map(|status| format!("{status}: {}", stats.count(*status))),
    );
    parts.join(" | ")
}

fn task_row(task: &Task) -> String {
    let assignee = task.assignee_name.as_deref().unwrap_or("-");
    let mut row = format!(
        "#{:<4} {:<9} {}  -> {}",
        task.id,
        task.status.as_str(),
        task.title,
        assignee
    );
    if let Some(label) = duration_label(task) {
        row.push_str(&format!("  [{label}]"));
    }
    row
}

fn staff_row(row: &StaffRow<'_>) -> String {
    format!(
        "#{:<4} {}  active: {}",
        row.member.id, row.member.full_name, row.active_load
    )
}

fn attachment_lines(task: &Task, origin: &str) -> Vec<String> {
    let groups = AttachmentGroups::of(task);
    let mut lines = Vec::new();
    for (label, group) in [
        ("Images", &groups.images),
        ("Videos", &groups.videos),
        ("Audio", &groups.audios),
    ] {
        if group.is_empty() {
            continue;
        }
        lines.push(format!("{label}:"));
        for attachment in group.iter() {
            match attachment_url(origin, attachment) {
                Some(url) => lines.push(format!("  {url}")),
                None => lines.push(format!("  (attachment {} has no file)", attachment.id)),
            }
        }
    }
    lines
}
