pub mod auth;
pub mod config;
pub mod views;

use anyhow::Result;
use jenkins_views::api::{HttpJenkinsApi, JenkinsConfig};
use jenkins_views::auth::{ApiToken, CredentialStore, account_key};
use jenkins_views::ViewClient;
use tracing::warn;

use crate::config::ServerConfig;

/// Keyring service name for stored API tokens
pub const KEYRING_SERVICE: &str = "jenkins-views";

/// Resolve connection settings, filling the token from the keyring when
/// the configuration does not carry one
pub fn jenkins_config(server: &ServerConfig) -> JenkinsConfig {
    let mut config = JenkinsConfig::new(&server.url);
    config.timeout_secs = server.timeout_secs;
    config.use_crumbs = server.use_crumbs;

    if let Some(user) = &server.username {
        let store = CredentialStore::new(KEYRING_SERVICE);
        config.api_token = resolve_token(server, user, |account| store.get(account));
        config.username = Some(user.clone());
    }

    config
}

/// Token from the configuration, else from `lookup` keyed by `user@host`
fn resolve_token(
    server: &ServerConfig,
    user: &str,
    lookup: impl Fn(&str) -> jenkins_views::Result<ApiToken>,
) -> Option<ApiToken> {
    if let Some(token) = &server.api_token {
        return Some(ApiToken::new(token.as_str()));
    }

    match lookup(&account_key(user, &server.url)) {
        Ok(token) => Some(token),
        Err(e) => {
            warn!(
                "no API token for {} ({}); requests will be sent without a password",
                user, e
            );
            None
        }
    }
}

/// Build a view client for the configured server
pub fn view_client(server: &ServerConfig) -> Result<ViewClient<HttpJenkinsApi>> {
    let api = HttpJenkinsApi::new(jenkins_config(server))?;
    Ok(ViewClient::new(api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jenkins_views::Error;

    #[test]
    fn test_config_token_is_used_for_user() {
        let server = ServerConfig {
            username: Some("alice".to_string()),
            api_token: Some("tok".to_string()),
            ..ServerConfig::default()
        };

        let config = jenkins_config(&server);
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.api_token.unwrap().expose_secret(), "tok");
    }

    #[test]
    fn test_config_token_skips_lookup() {
        let server = ServerConfig {
            api_token: Some("tok".to_string()),
            ..ServerConfig::default()
        };

        let token = resolve_token(&server, "alice", |_| panic!("keyring consulted"));
        assert_eq!(token.unwrap().expose_secret(), "tok");
    }

    #[test]
    fn test_failed_lookup_leaves_token_unset() {
        let server = ServerConfig {
            url: "https://ci.example.com/".to_string(),
            ..ServerConfig::default()
        };

        let token = resolve_token(&server, "alice", |account| {
            assert_eq!(account, "alice@ci.example.com");
            Err(Error::CredentialsNotFound(account.to_string()))
        });
        assert!(token.is_none());
    }

    #[test]
    fn test_stored_token_is_used_when_config_has_none() {
        let server = ServerConfig::default();

        let token = resolve_token(&server, "alice", |_| Ok(ApiToken::new("from-keyring")));
        assert_eq!(token.unwrap().expose_secret(), "from-keyring");
    }

    #[test]
    fn test_anonymous_config_has_no_credentials() {
        let server = ServerConfig {
            api_token: Some("tok".to_string()),
            ..ServerConfig::default()
        };

        let config = jenkins_config(&server);
        assert!(config.username.is_none());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_settings_carry_over() {
        let server = ServerConfig {
            url: "https://ci.example.com".to_string(),
            timeout_secs: 7,
            use_crumbs: false,
            ..ServerConfig::default()
        };

        let config = jenkins_config(&server);
        assert_eq!(config.url, "https://ci.example.com");
        assert_eq!(config.timeout_secs, 7);
        assert!(!config.use_crumbs);
    }
}
