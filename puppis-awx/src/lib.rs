//! AWX REST API client
//!
//! Typed client for the AWX/Ansible Tower v2 API. Wraps `reqwest` with
//! authentication, list-envelope handling and per-resource services so
//! callers never build raw requests.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use client::AwxClient;
pub use config::{AwxAuth, AwxConfig};
pub use error::{AwxError, AwxResult};
