//! taskdesk - client core for the task-assignment dashboard
//!
//! Holds the signed-in session, the shared task/staff snapshot, and the
//! mutation coordinator that keeps that snapshot consistent with the REST
//! backend. The view layer derives everything a dashboard renders from
//! (snapshot, identity, filter) without touching the network.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod render;
pub mod services;
pub mod view;

pub use api::{Backend, HttpBackend};
pub use auth::{Identity, Session, SessionState};
pub use error::{ClientError, ClientResult, ErrorKind, RequestError};
pub use services::{Coordinator, SnapshotStore};
