//! Jenkins API transport.
//!
//! The [`JenkinsApi`] trait is the seam between view operations and the
//! wire. [`ViewClient`](crate::ViewClient) only builds paths and payloads;
//! an implementation of this trait owns authentication, connection handling
//! and status checks.
//!
//! # Example
//!
//! ```ignore
//! use jenkins_views::api::{HttpJenkinsApi, JenkinsConfig};
//! use jenkins_views::ViewClient;
//!
//! let api = HttpJenkinsApi::new(JenkinsConfig::new("https://ci.example.com"))?;
//! let views = ViewClient::new(api);
//! for name in views.list("", true).await? {
//!     println!("{name}");
//! }
//! ```

mod http;

use std::sync::Arc;

use async_trait::async_trait;

pub use http::{HttpJenkinsApi, JenkinsConfig};

use crate::{FormParams, Result};

/// Generic request primitives of a Jenkins server.
///
/// Paths are server-relative and start with `/` (or are empty for the root).
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    /// GET `<path>/api/json`, optionally restricted with a `tree` query.
    async fn api_get_request(&self, path: &str, tree: Option<&str>) -> Result<serde_json::Value>;

    /// POST form-encoded `form` to `path`.
    async fn api_post_request(&self, path: &str, form: &FormParams) -> Result<()>;

    /// Raw XML from `<path>/config.xml`.
    async fn get_config(&self, path: &str) -> Result<String>;

    /// Replace `<path>/config.xml` with `xml`.
    async fn post_config(&self, path: &str, xml: &str) -> Result<()>;
}

#[async_trait]
impl<T: JenkinsApi + ?Sized> JenkinsApi for Arc<T> {
    async fn api_get_request(&self, path: &str, tree: Option<&str>) -> Result<serde_json::Value> {
        (**self).api_get_request(path, tree).await
    }

    async fn api_post_request(&self, path: &str, form: &FormParams) -> Result<()> {
        (**self).api_post_request(path, form).await
    }

    async fn get_config(&self, path: &str) -> Result<String> {
        (**self).get_config(path).await
    }

    async fn post_config(&self, path: &str, xml: &str) -> Result<()> {
        (**self).post_config(path, xml).await
    }
}

#[async_trait]
impl<T: JenkinsApi + ?Sized> JenkinsApi for &T {
    async fn api_get_request(&self, path: &str, tree: Option<&str>) -> Result<serde_json::Value> {
        (**self).api_get_request(path, tree).await
    }

    async fn api_post_request(&self, path: &str, form: &FormParams) -> Result<()> {
        (**self).api_post_request(path, form).await
    }

    async fn get_config(&self, path: &str) -> Result<String> {
        (**self).get_config(path).await
    }

    async fn post_config(&self, path: &str, xml: &str) -> Result<()> {
        (**self).post_config(path, xml).await
    }
}
