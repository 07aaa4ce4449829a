//! Unified client error handling
//!
//! Every backend failure is caught where the call is made and turned into a
//! `ClientError`. The presentation layer decides how to surface it; the
//! public message never leaks transport or server details.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad credentials or an unusable token returned at login.
    Auth,
    /// A create/update/delete/action call (or its follow-up refetch) failed.
    Mutation,
    /// A plain list fetch failed.
    Fetch,
    /// A persisted token could not be decoded.
    Decode,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{action} failed: {source}")]
    Mutation {
        action: &'static str,
        #[source]
        source: RequestError,
    },

    #[error("Fetching {resource} failed: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: RequestError,
    },

    #[error("Token decode failed: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),
}

/// Low-level failure of a single backend request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("backend responded with {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no such {resource} with id {id}")]
    NotFound { resource: &'static str, id: i64 },
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::InvalidResponse(_) => None,
        }
    }
}

impl ClientError {
    pub fn mutation(action: &'static str, source: RequestError) -> Self {
        Self::Mutation { action, source }
    }

    pub fn fetch(resource: &'static str, source: RequestError) -> Self {
        Self::Fetch { resource, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Mutation { .. } => ErrorKind::Mutation,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Message safe to show to the user.
    pub fn public_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Auth | ErrorKind::Decode => "Invalid login or password",
            ErrorKind::Mutation | ErrorKind::Fetch => "An error occurred, please try again",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
