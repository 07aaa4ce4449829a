//! HTTP client for the task-assignment REST backend.
//!
//! Provides type-safe methods for:
//! - Token issuance (login)
//! - Task listing, create/update (multipart), delete and status actions
//! - Staff listing, create/update and delete

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use super::backend::Backend;
use super::form::TaskForm;
use crate::auth::{Credentials, TokenPair, TokenStore};
use crate::domain::{
    CreateStaff, CreateTask, StaffId, StaffMember, Task, TaskAction, TaskId, UpdateStaff,
    UpdateTask,
};
use crate::error::RequestError;

/// Client for the REST backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

/// Error body shapes the backend uses.
#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl BackendErrorResponse {
    fn message(self) -> Option<String> {
        self.error.or(self.detail)
    }
}

impl HttpBackend {
    /// Create a new backend client.
    ///
    /// `base_url` must end with a slash; every path is joined onto it.
    pub fn new(base_url: Url, tokens: Arc<dyn TokenStore>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::debug!(base_url = %base_url, "Backend client initialized");

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    fn url(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|e| RequestError::InvalidResponse(format!("bad request path {path}: {e}")))
    }

    /// Start a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RequestError> {
        let url = self.url(path)?;
        debug!(%method, url = %url, "Backend request");

        let mut req = self.client.request(method, url);
        match self.tokens.access_token() {
            Ok(Some(token)) => req = req.bearer_auth(token),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = ?e, "Token store unreadable, sending unauthenticated"),
        }
        Ok(req)
    }

    /// Send and turn non-success statuses into `RequestError::Status`.
    async fn send(&self, req: RequestBuilder) -> Result<Response, RequestError> {
        let response = req.send().await.map_err(|e| {
            error!(error = %e, "Backend request failed");
            RequestError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<BackendErrorResponse>()
            .await
            .ok()
            .and_then(BackendErrorResponse::message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        error!(status = %status, message = %message, "Backend error");
        Err(RequestError::Status { status, message })
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, RequestError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        response.json::<R>().await.map_err(|e| {
            error!(error = %e, "Failed to parse backend response");
            RequestError::InvalidResponse(e.to_string())
        })
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<(), RequestError> {
        self.send(req).await.map(|_| ())
    }
}

impl Backend for HttpBackend {
    #[instrument(skip(self, credentials))]
    async fn obtain_tokens(&self, credentials: &Credentials) -> Result<TokenPair, RequestError> {
        // Login never carries a stale bearer token
        let req = self.client.post(self.url("login/")?).json(credentials);
        let response = self.send(req).await?;
        response
            .json::<TokenPair>()
            .await
            .map_err(|e| RequestError::InvalidResponse(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, RequestError> {
        self.get_json("tasks/").await
    }

    #[instrument(skip(self, cmd), fields(title = %cmd.title, files = cmd.files.len()))]
    async fn create_task(&self, cmd: &CreateTask) -> Result<(), RequestError> {
        let form = TaskForm::from(cmd).into_multipart();
        let req = self.request(Method::POST, "tasks/")?.multipart(form);
        self.send_empty(req).await
    }

    #[instrument(skip(self, cmd), fields(id = cmd.id, files = cmd.files.len()))]
    async fn update_task(&self, cmd: &UpdateTask) -> Result<(), RequestError> {
        let form = TaskForm::from(cmd).into_multipart();
        let req = self
            .request(Method::PATCH, &format!("tasks/{}/", cmd.id))?
            .multipart(form);
        self.send_empty(req).await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> Result<(), RequestError> {
        let req = self.request(Method::DELETE, &format!("tasks/{id}/"))?;
        self.send_empty(req).await
    }

    #[instrument(skip(self))]
    async fn task_action(&self, id: TaskId, action: TaskAction) -> Result<(), RequestError> {
        let req = self.request(Method::POST, &format!("tasks/{id}/{}/", action.path()))?;
        self.send_empty(req).await
    }

    #[instrument(skip(self))]
    async fn list_staff(&self) -> Result<Vec<StaffMember>, RequestError> {
        self.get_json("programmers/").await
    }

    #[instrument(skip(self, cmd))]
    async fn create_staff(&self, cmd: &CreateStaff) -> Result<(), RequestError> {
        let req = self
            .request(Method::POST, "programmers/create-user/")?
            .json(cmd);
        self.send_empty(req).await
    }

    #[instrument(skip(self, cmd), fields(id = cmd.id))]
    async fn update_staff(&self, cmd: &UpdateStaff) -> Result<(), RequestError> {
        let req = self
            .request(Method::PATCH, &format!("programmers/{}/update-user/", cmd.id))?
            .json(cmd);
        self.send_empty(req).await
    }

    #[instrument(skip(self))]
    async fn delete_staff(&self, id: StaffId) -> Result<(), RequestError> {
        let req = self.request(Method::DELETE, &format!("programmers/{id}/"))?;
        self.send_empty(req).await
    }
}
