//! View management operations.
//!
//! [`ViewClient`] translates view operations into requests against the
//! Jenkins URL scheme:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | create | `POST /createView` |
//! | configure | `POST /view/<name>/configSubmit` |
//! | delete | `POST /view/<name>/doDelete` |
//! | list | `GET /api/json?tree=views[name]` |
//! | list jobs | `GET /view/<name>/api/json` |
//! | add / remove job | `POST /view/<name>/addJobToView?name=<job>` |
//! | config | `GET`/`POST /view/<name>/config.xml` |
//!
//! Multi-step operations run their requests in order and do not roll back:
//! if the second step of [`create_list_view`](ViewClient::create_list_view)
//! fails, the view exists unconfigured.

use regex::RegexBuilder;
use tracing::{debug, info, warn};

use crate::api::JenkinsApi;
use crate::types::{JobsResponse, ViewsResponse};
use crate::{
    ALL_VIEW, CreateViewRequest, Error, FormParams, JobSummary, ListViewConfig,
    ListViewConfigRequest, Result, ViewSummary, ViewType,
};

/// Percent-encode a name for use in a path segment or query value.
pub fn encode_name(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Server path of a view: `/view/<encoded-name>`.
pub fn request_path(view_name: &str) -> String {
    format!("/view/{}", encode_name(view_name))
}

/// Client for the view API of one Jenkins server.
pub struct ViewClient<A> {
    api: A,
}

impl<A: JenkinsApi> ViewClient<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying API collaborator.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Server path of a view. See [`request_path`].
    pub fn request_path(&self, view_name: &str) -> String {
        request_path(view_name)
    }

    /// Create an empty view of the given type.
    pub async fn create(&self, view_name: &str, view_type: ViewType) -> Result<()> {
        let form = CreateViewRequest::new(view_name, view_type).to_form()?;
        info!(view = view_name, mode = view_type.mode(), "creating view");
        self.api.api_post_request("/createView", &form).await
    }

    /// Create a view from a type name such as `"listview"` or `"myview"`.
    ///
    /// Unknown names fail with [`Error::UnsupportedType`] before any request.
    pub async fn create_named(&self, view_name: &str, view_type: &str) -> Result<()> {
        let view_type: ViewType = view_type.parse()?;
        self.create(view_name, view_type).await
    }

    /// Create a list view and submit its full configuration.
    pub async fn create_list_view(&self, config: &ListViewConfig) -> Result<()> {
        if config.name.is_empty() {
            return Err(Error::InvalidArgument(
                "name is required for creating a view".to_string(),
            ));
        }

        let request = ListViewConfigRequest::from_config(config);
        let form = request.to_form(config)?;

        self.create(&config.name, ViewType::ListView).await?;

        let path = format!("{}/configSubmit", request_path(&config.name));
        info!(view = %config.name, "configuring list view");
        self.api.api_post_request(&path, &form).await
    }

    /// Delete a view.
    pub async fn delete(&self, view_name: &str) -> Result<()> {
        let path = format!("{}/doDelete", request_path(view_name));
        info!(view = view_name, "deleting view");
        self.api.api_post_request(&path, &FormParams::new()).await
    }

    /// Delete every view except `All`, in listing order.
    ///
    /// Stops at the first failed delete; views deleted before it stay deleted.
    pub async fn delete_all(&self) -> Result<()> {
        let names = self.list("", true).await?;
        let total = names.iter().filter(|n| *n != ALL_VIEW).count();

        let mut deleted = 0;
        for name in names.iter().filter(|n| *n != ALL_VIEW) {
            if let Err(e) = self.delete(name).await {
                warn!(view = %name, deleted, total, error = %e, "delete_all stopped");
                return Err(e);
            }
            deleted += 1;
        }

        info!(deleted, "deleted all views");
        Ok(())
    }

    /// Names of views matching the regular expression `filter`.
    ///
    /// An empty filter matches every view. The pattern is validated before
    /// the server is contacted.
    pub async fn list(&self, filter: &str, ignore_case: bool) -> Result<Vec<String>> {
        let pattern = RegexBuilder::new(filter)
            .case_insensitive(ignore_case)
            .build()?;

        let views = self.fetch_views("views[name]").await?;
        let names: Vec<String> = views
            .into_iter()
            .map(|v| v.name)
            .filter(|name| pattern.is_match(name))
            .collect();

        debug!(filter, ignore_case, matched = names.len(), "listed views");
        Ok(names)
    }

    /// Like [`list`](Self::list), keeping only views of `view_type`.
    pub async fn list_by_type(
        &self,
        view_type: ViewType,
        filter: &str,
        ignore_case: bool,
    ) -> Result<Vec<String>> {
        let pattern = RegexBuilder::new(filter)
            .case_insensitive(ignore_case)
            .build()?;

        let views = self.fetch_views("views[name,_class]").await?;
        Ok(views
            .into_iter()
            .filter(|v| v.class.as_deref() == Some(view_type.mode()))
            .map(|v| v.name)
            .filter(|name| pattern.is_match(name))
            .collect())
    }

    /// Whether a view named exactly `view_name` exists.
    pub async fn exists(&self, view_name: &str) -> Result<bool> {
        let views = self.fetch_views("views[name]").await?;
        Ok(views.iter().any(|v| v.name == view_name))
    }

    /// Names of the jobs in a view.
    ///
    /// Fails with [`Error::ViewNotFound`] when the view is missing, without
    /// requesting the view itself.
    pub async fn list_jobs(&self, view_name: &str) -> Result<Vec<String>> {
        Ok(self
            .list_jobs_with_details(view_name)
            .await?
            .into_iter()
            .map(|job| job.name)
            .collect())
    }

    /// Jobs in a view with their URL and status color.
    pub async fn list_jobs_with_details(&self, view_name: &str) -> Result<Vec<JobSummary>> {
        if !self.exists(view_name).await? {
            return Err(Error::ViewNotFound(view_name.to_string()));
        }

        let value = self
            .api
            .api_get_request(&request_path(view_name), None)
            .await?;
        let response: JobsResponse = parse_response(value, "view jobs")?;

        debug!(view = view_name, jobs = response.jobs.len(), "listed jobs");
        Ok(response.jobs)
    }

    /// Add a job to a view. The server reports unknown jobs or views.
    pub async fn add_job(&self, view_name: &str, job_name: &str) -> Result<()> {
        let path = format!(
            "{}/addJobToView?name={}",
            request_path(view_name),
            encode_name(job_name)
        );
        info!(view = view_name, job = job_name, "adding job to view");
        self.api.api_post_request(&path, &FormParams::new()).await
    }

    /// Remove a job from a view. The server reports unknown jobs or views.
    pub async fn remove_job(&self, view_name: &str, job_name: &str) -> Result<()> {
        let path = format!(
            "{}/removeJobFromView?name={}",
            request_path(view_name),
            encode_name(job_name)
        );
        info!(view = view_name, job = job_name, "removing job from view");
        self.api.api_post_request(&path, &FormParams::new()).await
    }

    /// Raw `config.xml` of a view.
    pub async fn get_config(&self, view_name: &str) -> Result<String> {
        self.api.get_config(&request_path(view_name)).await
    }

    /// Replace a view's `config.xml`. The XML is sent unchanged.
    pub async fn post_config(&self, view_name: &str, xml: &str) -> Result<()> {
        info!(view = view_name, "posting view config");
        self.api.post_config(&request_path(view_name), xml).await
    }

    async fn fetch_views(&self, tree: &str) -> Result<Vec<ViewSummary>> {
        let value = self.api.api_get_request("", Some(tree)).await?;
        let response: ViewsResponse = parse_response(value, "view list")?;
        Ok(response.views)
    }
}

fn parse_response<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::UnexpectedResponse(format!("{what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_encodes_spaces_and_reserved_characters() {
        assert_eq!(request_path("release"), "/view/release");
        assert_eq!(request_path("my view"), "/view/my%20view");
        assert_eq!(request_path("a/b?c#d"), "/view/a%2Fb%3Fc%23d");
        assert_eq!(request_path("50%&more"), "/view/50%25%26more");
    }

    #[test]
    fn request_path_and_job_encoding_agree() {
        let name = "nightly build & test";
        assert_eq!(request_path(name), format!("/view/{}", encode_name(name)));
    }

    #[test]
    fn parse_response_reports_missing_field() {
        let value = serde_json::json!({ "jobs": [] });
        let err = parse_response::<ViewsResponse>(value, "view list").unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(ref m) if m.starts_with("view list")));
    }
}
