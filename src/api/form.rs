//! Multipart payload assembly for task create/update
//!
//! The payload is first built as a plain value so its shape can be
//! inspected, then turned into a `reqwest` multipart form.

use reqwest::multipart::{Form, Part};

use crate::domain::{CreateTask, PendingFile, PendingFiles, StaffId, TaskStatus, UpdateTask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub fields: Vec<(&'static str, String)>,
    /// (field group, file), e.g. ("images", a.png)
    pub files: Vec<(&'static str, PendingFile)>,
}

impl TaskForm {
    fn new(
        title: &str,
        description: &str,
        assignee_id: StaffId,
        status: TaskStatus,
        files: &PendingFiles,
    ) -> Self {
        let mut fields = vec![
            ("title", title.to_string()),
            ("description", description.to_string()),
            ("assigned_to", assignee_id.to_string()),
        ];
        // Unrecognized statuses are never sent back
        if status != TaskStatus::Unknown {
            fields.push(("status", status.as_str().to_string()));
        }
        let files = files
            .iter()
            .map(|(file_type, file)| (file_type.field_name(), file.clone()))
            .collect();

        Self { fields, files }
    }

    /// Names of the file groups present, in first-seen order.
    pub fn file_groups(&self) -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = Vec::new();
        for (group, _) in &self.files {
            if !groups.contains(group) {
                groups.push(group);
            }
        }
        groups
    }

    pub fn into_multipart(self) -> Form {
        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        self.files.into_iter().fold(form, |form, (name, file)| {
            form.part(name, Part::bytes(file.content).file_name(file.file_name))
        })
    }
}

impl From<&CreateTask> for TaskForm {
    fn from(cmd: &CreateTask) -> Self {
        Self::new(
            &cmd.title,
            &cmd.description,
            cmd.assignee_id,
            cmd.status,
            &cmd.files,
        )
    }
}

impl From<&UpdateTask> for TaskForm {
    fn from(cmd: &UpdateTask) -> Self {
        Self::new(
            &cmd.title,
            &cmd.description,
            cmd.assignee_id,
            cmd.status,
            &cmd.files,
        )
    }
}
