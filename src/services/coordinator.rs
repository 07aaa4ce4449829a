//! Mutation coordinator
//!
//! Every state-changing action issues exactly one backend request and, once
//! that request has succeeded, re-reads the full collection(s) before
//! returning. Nothing is applied locally ahead of the backend: on any
//! failure the snapshot stays exactly as it was.

use futures::try_join;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::snapshot::SnapshotStore;
use crate::api::Backend;
use crate::domain::{
    CreateStaff, CreateTask, StaffCommand, StaffId, TaskAction, TaskCommand, TaskId, UpdateStaff,
    UpdateTask,
};
use crate::error::{ClientError, ClientResult, RequestError};

/// Which collections a mutation invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refetch {
    Tasks,
    /// Staff changes can cascade into tasks (deleting a member drops theirs).
    TasksAndStaff,
}

pub struct Coordinator<B> {
    backend: B,
    snapshot: Arc<SnapshotStore>,
}

impl<B: Backend> Coordinator<B> {
    pub fn new(backend: B) -> Self {
        Self::with_snapshot(backend, Arc::new(SnapshotStore::new()))
    }

    pub fn with_snapshot(backend: B, snapshot: Arc<SnapshotStore>) -> Self {
        Self { backend, snapshot }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> &Arc<SnapshotStore> {
        &self.snapshot
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch tasks and staff concurrently. Both are replaced or neither is.
    #[instrument(skip(self))]
    pub async fn load(&self) -> ClientResult<()> {
        let (tasks, staff) = try_join!(
            async {
                self.backend
                    .list_tasks()
                    .await
                    .map_err(|e| ClientError::fetch("tasks", e))
            },
            async {
                self.backend
                    .list_staff()
                    .await
                    .map_err(|e| ClientError::fetch("staff", e))
            }
        )
        .map_err(|e| {
            error!(error = %e, "Initial load failed");
            e
        })?;

        self.snapshot.replace_tasks(tasks);
        self.snapshot.replace_staff(staff);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn refresh_tasks(&self) -> ClientResult<()> {
        let tasks = self.backend.list_tasks().await.map_err(|e| {
            error!(error = %e, "Task fetch failed");
            ClientError::fetch("tasks", e)
        })?;
        self.snapshot.replace_tasks(tasks);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn refresh_staff(&self) -> ClientResult<()> {
        let staff = self.backend.list_staff().await.map_err(|e| {
            error!(error = %e, "Staff fetch failed");
            ClientError::fetch("staff", e)
        })?;
        self.snapshot.replace_staff(staff);
        Ok(())
    }

    // =========================================================================
    // Task mutations
    // =========================================================================

    pub async fn submit_task(&self, cmd: &TaskCommand) -> ClientResult<()> {
        match cmd {
            TaskCommand::Create(cmd) => self.create_task(cmd).await,
            TaskCommand::Update(cmd) => self.update_task(cmd).await,
        }
    }

    pub async fn create_task(&self, cmd: &CreateTask) -> ClientResult<()> {
        self.mutate("create task", Refetch::Tasks, self.backend.create_task(cmd))
            .await
    }

    pub async fn update_task(&self, cmd: &UpdateTask) -> ClientResult<()> {
        self.mutate("update task", Refetch::Tasks, self.backend.update_task(cmd))
            .await
    }

    pub async fn delete_task(&self, id: TaskId) -> ClientResult<()> {
        self.mutate("delete task", Refetch::Tasks, self.backend.delete_task(id))
            .await
    }

    /// Run a status transition. Legality is the backend's call.
    pub async fn transition(&self, id: TaskId, action: TaskAction) -> ClientResult<()> {
        self.mutate(
            action.describe(),
            Refetch::Tasks,
            self.backend.task_action(id, action),
        )
        .await
    }

    pub async fn start(&self, id: TaskId) -> ClientResult<()> {
        self.transition(id, TaskAction::Start).await
    }

    pub async fn complete(&self, id: TaskId) -> ClientResult<()> {
        self.transition(id, TaskAction::Complete).await
    }

    pub async fn approve(&self, id: TaskId) -> ClientResult<()> {
        self.transition(id, TaskAction::Approve).await
    }

    pub async fn reject(&self, id: TaskId) -> ClientResult<()> {
        self.transition(id, TaskAction::Reject).await
    }

    // =========================================================================
    // Staff mutations
    // =========================================================================

    pub async fn submit_staff(&self, cmd: &StaffCommand) -> ClientResult<()> {
        match cmd {
            StaffCommand::Create(cmd) => self.create_staff(cmd).await,
            StaffCommand::Update(cmd) => self.update_staff(cmd).await,
        }
    }

    pub async fn create_staff(&self, cmd: &CreateStaff) -> ClientResult<()> {
        self.mutate(
            "create staff member",
            Refetch::TasksAndStaff,
            self.backend.create_staff(cmd),
        )
        .await
    }

    pub async fn update_staff(&self, cmd: &UpdateStaff) -> ClientResult<()> {
        self.mutate(
            "update staff member",
            Refetch::TasksAndStaff,
            self.backend.update_staff(cmd),
        )
        .await
    }

    pub async fn delete_staff(&self, id: StaffId) -> ClientResult<()> {
        self.mutate(
            "delete staff member",
            Refetch::TasksAndStaff,
            self.backend.delete_staff(id),
        )
        .await
    }

    /// Await the mutation, then refetch. The refetch is only issued after the
    /// mutation response has been observed.
    #[instrument(skip(self, request))]
    async fn mutate<F>(&self, action: &'static str, refetch: Refetch, request: F) -> ClientResult<()>
    where
        F: Future<Output = Result<(), RequestError>>,
    {
        request.await.map_err(|e| {
            error!(error = %e, "Mutation failed");
            ClientError::mutation(action, e)
        })?;

        match refetch {
            Refetch::Tasks => {
                let tasks = self.backend.list_tasks().await;
                let tasks = tasks.map_err(|e| refetch_failed(action, e))?;
                self.snapshot.replace_tasks(tasks);
            }
            Refetch::TasksAndStaff => {
                let (tasks, staff) =
                    try_join!(self.backend.list_tasks(), self.backend.list_staff())
                        .map_err(|e| refetch_failed(action, e))?;
                self.snapshot.replace_tasks(tasks);
                self.snapshot.replace_staff(staff);
            }
        }

        info!(
            task_generation = self.snapshot.task_generation(),
            "Mutation applied"
        );
        Ok(())
    }
}

fn refetch_failed(action: &'static str, e: RequestError) -> ClientError {
    error!(error = %e, "Refetch after mutation failed");
    ClientError::mutation(action, e)
}
