//! reqwest-backed [`JenkinsApi`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::JenkinsApi;
use crate::auth::ApiToken;
use crate::{Error, FormParams, Result};

/// Default Jenkins base URL.
pub const DEFAULT_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HttpJenkinsApi`].
#[derive(Debug, Clone)]
pub struct JenkinsConfig {
    pub url: String,
    pub username: Option<String>,
    pub api_token: Option<ApiToken>,
    pub timeout_secs: u64,
    /// Fetch a CSRF crumb before each POST.
    pub use_crumbs: bool,
}

impl JenkinsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_crumbs: true,
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, token: ApiToken) -> Self {
        self.username = Some(username.into());
        self.api_token = Some(token);
        self
    }
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// Response from `/crumbIssuer/api/json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrumbResponse {
    crumb: String,
    crumb_request_field: String,
}

/// Talks to a Jenkins server over HTTP(S).
pub struct HttpJenkinsApi {
    base_url: String,
    username: Option<String>,
    api_token: Option<ApiToken>,
    use_crumbs: bool,
    client: reqwest::Client,
}

impl HttpJenkinsApi {
    /// Build a client for the server described by `config`.
    pub fn new(config: JenkinsConfig) -> Result<Self> {
        // Crumbs are bound to the session cookie set by the crumb issuer
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username,
            api_token: config.api_token,
            use_crumbs: config.use_crumbs,
            client,
        })
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => builder.basic_auth(
                user,
                self.api_token.as_ref().map(|t| t.expose_secret()),
            ),
            None => builder,
        }
    }

    /// Fetch a CSRF crumb. `None` when the server has no crumb issuer.
    async fn crumb(&self) -> Result<Option<CrumbResponse>> {
        let url = api_json_url(&self.base_url, "/crumbIssuer", None);
        debug!(%url, "fetching crumb");

        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("crumb issuer not enabled on server");
            return Ok(None);
        }

        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn post(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        let mut builder = self.authorize(self.client.post(url));
        if self.use_crumbs
            && let Some(crumb) = self.crumb().await?
        {
            builder = builder.header(crumb.crumb_request_field, crumb.crumb);
        }
        Ok(builder)
    }
}

#[async_trait]
impl JenkinsApi for HttpJenkinsApi {
    async fn api_get_request(&self, path: &str, tree: Option<&str>) -> Result<serde_json::Value> {
        let url = api_json_url(&self.base_url, path, tree);
        debug!(method = "GET", %url, "jenkins request");

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn api_post_request(&self, path: &str, form: &FormParams) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = "POST", %url, fields = form.len(), "jenkins request");

        let response = self.post(&url).await?.form(form).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_config(&self, path: &str) -> Result<String> {
        let url = config_url(&self.base_url, path);
        debug!(method = "GET", %url, "jenkins request");

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn post_config(&self, path: &str, xml: &str) -> Result<()> {
        let url = config_url(&self.base_url, path);
        debug!(method = "POST", %url, bytes = xml.len(), "jenkins request");

        let response = self
            .post(&url)
            .await?
            .header(reqwest::header::CONTENT_TYPE, "application/xml;charset=UTF-8")
            .body(xml.to_string())
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// `<base><path>/api/json`, with an encoded `tree` query when given.
fn api_json_url(base: &str, path: &str, tree: Option<&str>) -> String {
    let mut url = format!("{}{}/api/json", base, path);
    if let Some(tree) = tree {
        url.push_str("?tree=");
        url.push_str(&urlencoding::encode(tree));
    }
    url
}

fn config_url(base: &str, path: &str) -> String {
    format!("{}{}/config.xml", base, path)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Server {
        status: status.as_u16(),
        body,
    })
}
