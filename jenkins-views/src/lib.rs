//! Client for the Jenkins view management API.
//!
//! This crate provides:
//! - [`ViewClient`] for creating, listing, configuring and deleting views
//! - [`JenkinsApi`](api::JenkinsApi), the request seam, with an HTTP implementation
//! - Credential management for API tokens
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     ViewClient                       │
//! │        (paths, form payloads, response parsing)      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  dyn JenkinsApi                      │
//! │   HttpJenkinsApi (reqwest, basic auth, CSRF crumb)   │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod api;
pub mod auth;
pub mod views;

pub use error::{Error, Result};
pub use types::{
    ALL_VIEW, ColumnDescriptor, CreateViewRequest, FormParams, JobSummary, LIST_VIEW_COLUMNS,
    LIST_VIEW_MODE, ListViewConfig, ListViewConfigRequest, MY_VIEW_MODE, StatusFilter,
    ViewSummary, ViewType, status_filter_value,
};
pub use views::{ViewClient, request_path};
