//! Shared fixtures for integration tests: an in-memory backend that behaves
//! like the REST service, plus token minting helpers.

#![allow(dead_code)]

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashSet;

use taskdesk::auth::{Claims, Credentials, TokenPair};
use taskdesk::domain::{
    Attachment, CreateStaff, CreateTask, DurationInfo, FileType, PendingFiles, StaffId,
    StaffMember, StaffProfile, StaffRoles, Task, TaskAction, TaskId, TaskStatus, TaskTimestamps,
    UpdateStaff, UpdateTask,
};
use taskdesk::{Backend, RequestError};

pub const SECRET: &[u8] = b"test-signing-secret";

/// Mint an access token the way the backend does.
pub fn mint_token(user_id: i64, username: &str, full_name: &str, is_staff: bool) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id,
        username: username.to_string(),
        full_name: Some(full_name.to_string()),
        is_staff,
        phone_number: None,
        exp: now + 3600,
        iat: Some(now),
        jti: Some(format!("jti-{user_id}-{now}")),
        token_type: Some("access".to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

pub fn expired_token() -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id: 1,
        username: "admin".to_string(),
        full_name: None,
        is_staff: true,
        phone_number: None,
        exp: now - 3600,
        iat: Some(now - 7200),
        jti: None,
        token_type: Some("access".to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

#[derive(Debug, Clone)]
struct Account {
    id: i64,
    username: String,
    password: String,
    full_name: String,
    is_staff: bool,
}

#[derive(Debug, Default)]
struct State {
    accounts: Vec<Account>,
    staff: Vec<StaffMember>,
    tasks: Vec<Task>,
    next_id: i64,
    next_attachment_id: i64,
    signed_in: Option<i64>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn staff_name(&self, id: StaffId) -> Option<String> {
        self.staff
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.full_name.clone())
    }

    fn attach(&mut self, task_id: TaskId, files: &PendingFiles) -> Vec<Attachment> {
        files
            .iter()
            .map(|(file_type, file)| {
                self.next_attachment_id += 1;
                Attachment {
                    id: self.next_attachment_id,
                    file_type,
                    file: Some(format!(
                        "/media/tasks/{task_id}/{}",
                        file.file_name
                    )),
                    created_at: Some(Utc::now()),
                }
            })
            .collect()
    }
}

/// In-memory stand-in for the REST backend.
///
/// Task lists are scoped to the signed-in account for non-staff users, new
/// tasks get server-side ids and timestamps, and transitions are checked
/// for legality. Any operation can be made to fail with `fail`.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    /// One administrator (`admin`/`admin123`) and two programmers
    /// (`prog1`/`prog2`, password `pass123`).
    pub fn seeded() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock();
            state.accounts.push(Account {
                id: 1,
                username: "admin".to_string(),
                password: "admin123".to_string(),
                full_name: "Site Admin".to_string(),
                is_staff: true,
            });
            state.next_id = 1;
        }
        backend.add_staff("Programmist", "1", "prog1");
        backend.add_staff("Programmist", "2", "prog2");
        backend
    }

    fn add_staff(&self, first: &str, last: &str, username: &str) -> StaffId {
        let mut state = self.state.lock();
        let id = state.next_id();
        let full_name = format!("{first} {last}");
        state.accounts.push(Account {
            id,
            username: username.to_string(),
            password: "pass123".to_string(),
            full_name: full_name.clone(),
            is_staff: false,
        });
        state.staff.push(StaffMember {
            id,
            full_name,
            phone_number: Some(format!("+99890000000{id}")),
            address: None,
            experience: None,
            education: None,
            bio: None,
            roles: StaffRoles::programmer(),
        });
        id
    }

    pub fn staff_id(&self, username: &str) -> StaffId {
        self.state
            .lock()
            .accounts
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.id)
            .unwrap()
    }

    /// Insert a task directly, bypassing the API.
    pub fn seed_task(&self, title: &str, assignee: StaffId, status: TaskStatus) -> TaskId {
        let mut state = self.state.lock();
        let id = state.next_id();
        let assignee_name = state.staff_name(assignee);
        state.tasks.push(new_task(id, title, "", assignee, assignee_name, status));
        id
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Make every call to `op` fail with a 500 until `recover` is called.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().remove(op);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn enter(&self, op: &'static str) -> Result<(), RequestError> {
        self.calls.lock().push(op);
        if self.failing.lock().contains(op) {
            return Err(RequestError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{op} failed"),
            });
        }
        Ok(())
    }
}

fn new_task(
    id: TaskId,
    title: &str,
    description: &str,
    assignee: StaffId,
    assignee_name: Option<String>,
    status: TaskStatus,
) -> Task {
    let now = Utc::now();
    let mut timestamps = TaskTimestamps {
        created_at: Some(now),
        updated_at: Some(now),
        ..TaskTimestamps::default()
    };
    stamp(&mut timestamps, status);

    Task {
        id,
        title: title.to_string(),
        description: description.to_string(),
        assignee_id: Some(assignee),
        assignee_name,
        status,
        timestamps,
        duration_info: DurationInfo::default(),
        attachments: Vec::new(),
    }
}

fn stamp(timestamps: &mut TaskTimestamps, status: TaskStatus) {
    let now = Some(Utc::now());
    timestamps.updated_at = now;
    match status {
        TaskStatus::Pending => timestamps.pending_at = now,
        TaskStatus::Todo => timestamps.todo_at = now,
        TaskStatus::Done => timestamps.done_at = now,
        TaskStatus::Approved => timestamps.approved_at = now,
        TaskStatus::Rejected => timestamps.rejected_at = now,
        TaskStatus::Unknown => {}
    }
}

fn bad_request(message: &str) -> RequestError {
    RequestError::Status {
        status: StatusCode::BAD_REQUEST,
        message: message.to_string(),
    }
}

impl Backend for FakeBackend {
    async fn obtain_tokens(&self, credentials: &Credentials) -> Result<TokenPair, RequestError> {
        self.enter("login")?;
        let mut state = self.state.lock();
        let account = state
            .accounts
            .iter()
            .find(|a| a.username == credentials.username && a.password == credentials.password)
            .cloned()
            .ok_or_else(|| RequestError::Status {
                status: StatusCode::UNAUTHORIZED,
                message: "No active account found with the given credentials".to_string(),
            })?;

        state.signed_in = Some(account.id);
        Ok(TokenPair {
            access: mint_token(
                account.id,
                &account.username,
                &account.full_name,
                account.is_staff,
            ),
            refresh: format!("refresh-{}", account.id),
        })
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RequestError> {
        self.enter("list_tasks")?;
        let state = self.state.lock();
        let worker = state
            .signed_in
            .and_then(|id| state.accounts.iter().find(|a| a.id == id))
            .filter(|a| !a.is_staff)
            .map(|a| a.id);

        Ok(state
            .tasks
            .iter()
            .filter(|t| worker.map_or(true, |id| t.assignee_id == Some(id)))
            .cloned()
            .collect())
    }

    async fn create_task(&self, cmd: &CreateTask) -> Result<(), RequestError> {
        self.enter("create_task")?;
        if cmd.title.trim().is_empty() {
            return Err(bad_request("title: This field may not be blank."));
        }

        let mut state = self.state.lock();
        let assignee_name = state
            .staff_name(cmd.assignee_id)
            .ok_or_else(|| bad_request("assigned_to: Invalid pk"))?;
        let id = state.next_id();
        let mut task = new_task(
            id,
            &cmd.title,
            &cmd.description,
            cmd.assignee_id,
            Some(assignee_name),
            cmd.status,
        );
        task.attachments = state.attach(id, &cmd.files);
        state.tasks.push(task);
        Ok(())
    }

    async fn update_task(&self, cmd: &UpdateTask) -> Result<(), RequestError> {
        self.enter("update_task")?;
        let mut state = self.state.lock();
        let assignee_name = state
            .staff_name(cmd.assignee_id)
            .ok_or_else(|| bad_request("assigned_to: Invalid pk"))?;
        let attachments = state.attach(cmd.id, &cmd.files);

        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == cmd.id)
            .ok_or(RequestError::NotFound {
                resource: "task",
                id: cmd.id,
            })?;
        task.title = cmd.title.clone();
        task.description = cmd.description.clone();
        task.assignee_id = Some(cmd.assignee_id);
        task.assignee_name = Some(assignee_name);
        if task.status != cmd.status {
            task.status = cmd.status;
            stamp(&mut task.timestamps, cmd.status);
        }
        task.attachments.extend(attachments);
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), RequestError> {
        self.enter("delete_task")?;
        let mut state = self.state.lock();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(RequestError::NotFound { resource: "task", id });
        }
        Ok(())
    }

    async fn task_action(&self, id: TaskId, action: TaskAction) -> Result<(), RequestError> {
        self.enter("task_action")?;
        let mut state = self.state.lock();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(RequestError::NotFound { resource: "task", id })?;

        let legal = match action {
            TaskAction::Start => task.status == TaskStatus::Pending,
            TaskAction::Complete => task.status.is_actionable(),
            TaskAction::Approve | TaskAction::Reject => task.status == TaskStatus::Done,
        };
        if !legal {
            return Err(bad_request("Invalid status transition"));
        }

        let target = action.target_status();
        task.status = target;
        stamp(&mut task.timestamps, target);
        Ok(())
    }

    async fn list_staff(&self) -> Result<Vec<StaffMember>, RequestError> {
        self.enter("list_staff")?;
        Ok(self.state.lock().staff.clone())
    }

    async fn create_staff(&self, cmd: &CreateStaff) -> Result<(), RequestError> {
        self.enter("create_staff")?;
        let username = format!("{}.{}", cmd.first_name, cmd.last_name).to_lowercase();
        let mut state = self.state.lock();
        if state.accounts.iter().any(|a| a.username == username) {
            return Err(bad_request("username: already exists"));
        }

        let id = state.next_id();
        let full_name = format!("{} {}", cmd.first_name, cmd.last_name);
        state.accounts.push(Account {
            id,
            username,
            password: cmd.password.clone(),
            full_name: full_name.clone(),
            is_staff: false,
        });
        state.staff.push(member(id, full_name, &cmd.profile, cmd.roles));
        Ok(())
    }

    async fn update_staff(&self, cmd: &UpdateStaff) -> Result<(), RequestError> {
        self.enter("update_staff")?;
        let mut state = self.state.lock();
        let full_name = format!("{} {}", cmd.first_name, cmd.last_name);

        let slot = state
            .staff
            .iter_mut()
            .find(|m| m.id == cmd.id)
            .ok_or(RequestError::NotFound {
                resource: "staff member",
                id: cmd.id,
            })?;
        *slot = member(cmd.id, full_name.clone(), &cmd.profile, cmd.roles);

        if let Some(account) = state.accounts.iter_mut().find(|a| a.id == cmd.id) {
            account.full_name = full_name.clone();
            if let Some(password) = &cmd.password {
                account.password = password.clone();
            }
        }
        // Task listings carry the assignee's name
        for task in state.tasks.iter_mut() {
            if task.assignee_id == Some(cmd.id) {
                task.assignee_name = Some(full_name.clone());
            }
        }
        Ok(())
    }

    async fn delete_staff(&self, id: StaffId) -> Result<(), RequestError> {
        self.enter("delete_staff")?;
        let mut state = self.state.lock();
        let before = state.staff.len();
        state.staff.retain(|m| m.id != id);
        if state.staff.len() == before {
            return Err(RequestError::NotFound {
                resource: "staff member",
                id,
            });
        }
        state.accounts.retain(|a| a.id != id);
        state.tasks.retain(|t| t.assignee_id != Some(id));
        Ok(())
    }
}

fn member(id: StaffId, full_name: String, profile: &StaffProfile, roles: StaffRoles) -> StaffMember {
    let text = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());
    StaffMember {
        id,
        full_name,
        phone_number: text(&profile.phone_number),
        address: text(&profile.address),
        experience: text(&profile.experience),
        education: text(&profile.education),
        bio: text(&profile.bio),
        roles,
    }
}

pub fn attachment_types(task: &Task) -> Vec<FileType> {
    task.attachments.iter().map(|a| a.file_type).collect()
}
