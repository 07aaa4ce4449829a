//! Form state for task and staff editors.
//!
//! A draft is the editable, possibly incomplete form; submitting it yields
//! an explicit create or update command.

use thiserror::Error;

use crate::domain::{
    CreateStaff, CreateTask, FileType, PendingFile, PendingFiles, StaffCommand, StaffId,
    StaffMember, StaffProfile, StaffRoles, Task, TaskCommand, TaskId, TaskStatus, UpdateStaff,
    UpdateTask,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("title is required")]
    MissingTitle,
    #[error("an assignee is required")]
    MissingAssignee,
    #[error("first and last name are required")]
    MissingName,
    #[error("a password is required for new staff members")]
    MissingPassword,
}

#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// Unset until the editor picks someone
    pub assignee_id: Option<StaffId>,
    pub status: TaskStatus,
    pub files: PendingFiles,
    editing: Option<TaskId>,
}

impl TaskDraft {
    /// Empty draft for a new task. New tasks start as TODO.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from an existing task. Existing attachments stay on
    /// the task; the file lists start empty.
    pub fn edit(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            assignee_id: task.assignee_id,
            status: task.status,
            files: PendingFiles::new(),
            editing: Some(task.id),
        }
    }

    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn pick_files(&mut self, file_type: FileType, files: impl IntoIterator<Item = PendingFile>) {
        self.files.add(file_type, files);
    }

    pub fn remove_file(&mut self, file_type: FileType, index: usize) -> Option<PendingFile> {
        self.files.remove(file_type, index)
    }

    pub fn submit(self) -> Result<TaskCommand, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        let assignee_id = self.assignee_id.ok_or(DraftError::MissingAssignee)?;

        Ok(match self.editing {
            Some(id) => TaskCommand::Update(UpdateTask {
                id,
                title: self.title,
                description: self.description,
                assignee_id,
                status: self.status,
                files: self.files,
            }),
            None => TaskCommand::Create(CreateTask {
                title: self.title,
                description: self.description,
                assignee_id,
                status: self.status,
                files: self.files,
            }),
        })
    }
}

#[derive(Debug, Clone)]
pub struct StaffDraft {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub profile: StaffProfile,
    pub roles: StaffRoles,
    editing: Option<StaffId>,
}

impl Default for StaffDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            profile: StaffProfile::default(),
            roles: StaffRoles::programmer(),
            editing: None,
        }
    }
}

impl StaffDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from a listed member.
    ///
    /// The full name splits at the first space: "Ali Vali Valiyev" edits as
    /// first "Ali", last "Vali Valiyev". The list endpoint may omit role
    /// flags, in which case the member edits as a programmer.
    pub fn edit(member: &StaffMember) -> Self {
        let (first_name, last_name) = split_full_name(&member.full_name);
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            first_name,
            last_name,
            password: String::new(),
            profile: StaffProfile {
                phone_number: text(&member.phone_number),
                address: text(&member.address),
                experience: text(&member.experience),
                education: text(&member.education),
                bio: text(&member.bio),
            },
            roles: if member.roles == StaffRoles::default() {
                StaffRoles::programmer()
            } else {
                member.roles
            },
            editing: Some(member.id),
        }
    }

    pub fn editing(&self) -> Option<StaffId> {
        self.editing
    }

    pub fn submit(self) -> Result<StaffCommand, DraftError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }

        match self.editing {
            Some(id) => Ok(StaffCommand::Update(UpdateStaff {
                id,
                first_name: self.first_name,
                last_name: self.last_name,
                password: Some(self.password).filter(|p| !p.is_empty()),
                profile: self.profile,
                roles: self.roles,
            })),
            None if self.password.is_empty() => Err(DraftError::MissingPassword),
            None => Ok(StaffCommand::Create(CreateStaff {
                first_name: self.first_name,
                last_name: self.last_name,
                password: self.password,
                profile: self.profile,
                roles: self.roles,
            })),
        }
    }
}

fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.trim().split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (full_name.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DurationInfo, TaskTimestamps};

    fn existing_task() -> Task {
        Task {
            id: 8,
            title: "Old title".to_string(),
            description: "desc".to_string(),
            assignee_id: Some(3),
            assignee_name: Some("Ali Valiyev".to_string()),
            status: TaskStatus::Rejected,
            timestamps: TaskTimestamps::default(),
            duration_info: DurationInfo::default(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn new_draft_needs_assignee() {
        let mut draft = TaskDraft::new();
        draft.title = "Ship it".to_string();
        assert_eq!(draft.status, TaskStatus::Todo);
        assert_eq!(draft.clone().submit().unwrap_err(), DraftError::MissingAssignee);

        draft.assignee_id = Some(4);
        let TaskCommand::Create(cmd) = draft.submit().unwrap() else {
            panic!("expected create");
        };
        assert_eq!(cmd.assignee_id, 4);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut draft = TaskDraft::new();
        draft.title = "   ".to_string();
        draft.assignee_id = Some(1);
        assert_eq!(draft.submit().unwrap_err(), DraftError::MissingTitle);
    }

    #[test]
    fn edit_draft_becomes_update_with_only_new_files() {
        let mut draft = TaskDraft::edit(&existing_task());
        assert_eq!(draft.editing(), Some(8));
        assert!(draft.files.is_empty());

        draft.pick_files(FileType::Image, [PendingFile::new("a.png", vec![1])]);
        draft.pick_files(FileType::Image, [PendingFile::new("b.png", vec![2])]);
        draft.remove_file(FileType::Image, 0);

        let TaskCommand::Update(cmd) = draft.submit().unwrap() else {
            panic!("expected update");
        };
        assert_eq!(cmd.id, 8);
        assert_eq!(cmd.status, TaskStatus::Rejected);
        let names: Vec<_> = cmd
            .files
            .group(FileType::Image)
            .iter()
            .map(|f| f.file_name.as_str())
            .collect();
        assert_eq!(names, ["b.png"]);
    }

    #[test]
    fn staff_edit_splits_full_name() {
        let member = StaffMember {
            id: 5,
            full_name: "Ali Vali Valiyev".to_string(),
            phone_number: Some("+998".to_string()),
            address: None,
            experience: Some("3 years".to_string()),
            education: None,
            bio: None,
            roles: StaffRoles::default(),
        };
        let draft = StaffDraft::edit(&member);

        assert_eq!(draft.first_name, "Ali");
        assert_eq!(draft.last_name, "Vali Valiyev");
        assert_eq!(draft.profile.experience, "3 years");
        assert_eq!(draft.profile.address, "");
        assert_eq!(draft.roles, StaffRoles::programmer());
    }

    #[test]
    fn staff_update_without_password_keeps_it() {
        let mut draft = StaffDraft::edit(&StaffMember {
            id: 5,
            full_name: "Ali Valiyev".to_string(),
            phone_number: None,
            address: None,
            experience: None,
            education: None,
            bio: None,
            roles: StaffRoles::default(),
        });
        draft.roles.is_tester = true;

        let StaffCommand::Update(cmd) = draft.submit().unwrap() else {
            panic!("expected update");
        };
        assert!(cmd.password.is_none());
        assert!(cmd.roles.is_programmer && cmd.roles.is_tester);
    }

    #[test]
    fn new_staff_needs_password_and_name() {
        let mut draft = StaffDraft::new();
        draft.first_name = "Ali".to_string();
        assert_eq!(draft.clone().submit().unwrap_err(), DraftError::MissingName);

        draft.last_name = "Valiyev".to_string();
        assert_eq!(draft.clone().submit().unwrap_err(), DraftError::MissingPassword);

        draft.password = "secret123".to_string();
        assert!(matches!(draft.submit().unwrap(), StaffCommand::Create(_)));
    }

    #[test]
    fn single_word_name_has_empty_last_name() {
        assert_eq!(split_full_name("Ali"), ("Ali".to_string(), String::new()));
    }
}
