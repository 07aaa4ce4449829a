//! REST backend access
//!
//! The `Backend` trait is what the session and coordinator talk to;
//! `HttpBackend` is the reqwest implementation.

pub mod backend;
pub mod client;
pub mod form;

pub use backend::Backend;
pub use client::HttpBackend;
pub use form::TaskForm;
