use serde::{Deserialize, Serialize};

/// Default Jenkins URL
pub const DEFAULT_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawJviewsConfig {
    #[serde(default)]
    pub server: RawServerConfig,
}

/// Server config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServerConfig {
    /// Jenkins base URL
    pub url: Option<String>,

    /// User for HTTP basic auth
    pub username: Option<String>,

    /// API token (prefer the keyring or JENKINS_API_TOKEN)
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Send a CSRF crumb with POST requests
    pub use_crumbs: Option<bool>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JviewsConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    pub timeout_secs: u64,

    pub use_crumbs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_crumbs: true,
        }
    }
}

impl JviewsConfig {
    /// Copy safe to print: the token is replaced by a marker
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.server.api_token.is_some() {
            config.server.api_token = Some("[REDACTED]".to_string());
        }
        config
    }
}
