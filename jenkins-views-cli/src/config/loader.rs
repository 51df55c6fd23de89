use super::types::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_URL, JviewsConfig, RawJviewsConfig, RawServerConfig,
    ServerConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variables that override file configuration
pub const URL_ENV_VAR: &str = "JENKINS_URL";
pub const USER_ENV_VAR: &str = "JENKINS_USER";
pub const TOKEN_ENV_VAR: &str = "JENKINS_API_TOKEN";

/// Directory overrides for the config file locations
pub const USER_CONFIG_DIR_ENV_VAR: &str = "JVIEWS_USER_CONFIG_DIR";
pub const PROJECT_CONFIG_DIR_ENV_VAR: &str = "JVIEWS_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + environment)
    pub fn load() -> Result<JviewsConfig> {
        let mut raw = RawJviewsConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        // Layer 3: Environment
        raw = Self::apply_env(raw, |key| std::env::var(key).ok());

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    /// Can be overridden with JVIEWS_USER_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn user_config_path() -> Option<PathBuf> {
        Self::user_config_path_with(std::env::var(USER_CONFIG_DIR_ENV_VAR).ok())
    }

    fn user_config_path_with(override_dir: Option<String>) -> Option<PathBuf> {
        match override_dir.filter(|dir| !dir.is_empty()) {
            Some(dir) => Some(PathBuf::from(dir).join("config.toml")),
            None => ProjectDirs::from("", "", "jenkins-views")
                .map(|dirs| dirs.config_dir().join("config.toml")),
        }
    }

    /// Get project config path
    /// Can be overridden with JVIEWS_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_DIR_ENV_VAR) {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".jenkins-views/config.toml")
        }
    }

    /// Load one explicit config file, then apply environment overrides
    pub fn load_file(path: &Path) -> Result<JviewsConfig> {
        let raw = Self::read_raw(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        Ok(Self::finalize(Self::apply_env(raw, |key| std::env::var(key).ok())))
    }

    fn read_raw(path: &Path) -> Result<RawJviewsConfig> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Overlay non-empty environment values onto a raw config
    pub fn apply_env(
        raw: RawJviewsConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> RawJviewsConfig {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let env = RawJviewsConfig {
            server: RawServerConfig {
                url: get(URL_ENV_VAR),
                username: get(USER_ENV_VAR),
                api_token: get(TOKEN_ENV_VAR),
                timeout_secs: None,
                use_crumbs: None,
            },
        };
        Self::merge_raw(raw, env)
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawJviewsConfig, overlay: RawJviewsConfig) -> RawJviewsConfig {
        RawJviewsConfig {
            server: RawServerConfig {
                url: overlay.server.url.or(base.server.url),
                username: overlay.server.username.or(base.server.username),
                api_token: overlay.server.api_token.or(base.server.api_token),
                timeout_secs: overlay.server.timeout_secs.or(base.server.timeout_secs),
                use_crumbs: overlay.server.use_crumbs.or(base.server.use_crumbs),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawJviewsConfig) -> JviewsConfig {
        JviewsConfig {
            server: ServerConfig {
                url: raw.server.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
                username: raw.server.username,
                api_token: raw.server.api_token,
                timeout_secs: raw.server.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                use_crumbs: raw.server.use_crumbs.unwrap_or(true),
            },
        }
    }
}
