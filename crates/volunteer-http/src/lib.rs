//! REST adapter for the volunteer engine
//!
//! Implements the collaborator ports of `volunteer-application` against the
//! volunteer backend's JSON API.
//!
//! ## Features
//!
//! - **Configurable**: base URL, timeouts, user-agent, bearer token
//! - **Status mapping**: 404, 401/403 and 400/422 become distinct domain errors
//! - **No retries**: a failed call is reported to the caller as is
//! - **Testing support**: exercised against wiremock

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::ApiClient;
pub use client::HttpClient;
pub use config::HttpConfig;
pub use error::{HttpError, Result};

/// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
