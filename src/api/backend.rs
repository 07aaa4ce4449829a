//! The seam between the client core and the REST collaborator.

use crate::auth::{Credentials, TokenPair};
use crate::domain::{
    CreateStaff, CreateTask, StaffId, StaffMember, Task, TaskAction, TaskId, UpdateStaff,
    UpdateTask,
};
use crate::error::RequestError;

/// Operations the task-assignment backend exposes.
///
/// Implementations issue exactly one request per call and never retry.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn obtain_tokens(&self, credentials: &Credentials) -> Result<TokenPair, RequestError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, RequestError>;

    async fn create_task(&self, cmd: &CreateTask) -> Result<(), RequestError>;

    async fn update_task(&self, cmd: &UpdateTask) -> Result<(), RequestError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), RequestError>;

    async fn task_action(&self, id: TaskId, action: TaskAction) -> Result<(), RequestError>;

    async fn list_staff(&self) -> Result<Vec<StaffMember>, RequestError>;

    async fn create_staff(&self, cmd: &CreateStaff) -> Result<(), RequestError>;

    async fn update_staff(&self, cmd: &UpdateStaff) -> Result<(), RequestError>;

    async fn delete_staff(&self, id: StaffId) -> Result<(), RequestError>;
}
