//! Credential management for Jenkins API tokens.
//!
//! Tokens live in the system keyring, keyed by `user@server`, with an
//! environment variable fallback for CI scenarios.
//!
//! # Example
//!
//! ```ignore
//! use jenkins_views::auth::CredentialStore;
//!
//! let store = CredentialStore::new("jenkins-views").with_env_fallback();
//! store.set("alice@ci.example.com", "11aa22bb33cc")?;
//! let token = store.get("alice@ci.example.com")?;
//! ```

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// Environment variable consulted when the keyring has no token.
pub const TOKEN_ENV_VAR: &str = "JENKINS_API_TOKEN";

/// A Jenkins API token that prevents accidental logging.
#[derive(Clone)]
pub struct ApiToken(SecretString);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the token value. Only call this when building a request.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiToken([REDACTED])")
    }
}

impl From<String> for ApiToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Keyring account name for a user on a server.
pub fn account_key(username: &str, server_url: &str) -> String {
    let host = server_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("{username}@{host}")
}

/// Token storage backed by the system keyring.
///
/// Lookups try the keyring first, then [`TOKEN_ENV_VAR`] when env
/// fallback is enabled. Writes always go to the keyring.
pub struct CredentialStore {
    service_name: String,
    env_fallback: bool,
}

impl CredentialStore {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            env_fallback: false,
        }
    }

    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    /// Get the token for `account`.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsNotFound` if neither source has one.
    pub fn get(&self, account: &str) -> Result<ApiToken> {
        if let Some(token) = self.get_from_keyring(account) {
            debug!(account, "retrieved API token from keyring");
            return Ok(token);
        }

        if self.env_fallback
            && let Some(token) = Self::get_from_env()
        {
            debug!(account, "retrieved API token from environment");
            return Ok(token);
        }

        Err(Error::CredentialsNotFound(account.to_string()))
    }

    /// Store a token for `account` in the system keyring.
    pub fn set(&self, account: &str, token: &str) -> Result<()> {
        let entry = self.keyring_entry(account)?;
        entry
            .set_password(token)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        debug!(account, "stored API token in keyring");
        Ok(())
    }

    /// Remove the token for `account` from the system keyring.
    pub fn delete(&self, account: &str) -> Result<()> {
        let entry = self.keyring_entry(account)?;
        entry.delete_credential().map_err(|e| match e {
            keyring::Error::NoEntry => Error::CredentialsNotFound(account.to_string()),
            _ => Error::Keyring(e.to_string()),
        })?;
        debug!(account, "deleted API token from keyring");
        Ok(())
    }

    /// Where the token for `account` would come from, if anywhere.
    pub fn credential_source(&self, account: &str) -> Option<CredentialSource> {
        if self.get_from_keyring(account).is_some() {
            Some(CredentialSource::Keyring)
        } else if self.env_fallback && Self::get_from_env().is_some() {
            Some(CredentialSource::Environment)
        } else {
            None
        }
    }

    fn keyring_entry(&self, account: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service_name, account).map_err(|e| Error::Keyring(e.to_string()))
    }

    fn get_from_keyring(&self, account: &str) -> Option<ApiToken> {
        let entry = self.keyring_entry(account).ok()?;
        entry.get_password().ok().map(ApiToken::new)
    }

    fn get_from_env() -> Option<ApiToken> {
        env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .map(ApiToken::new)
    }
}

/// Source of a stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Keyring,
    Environment,
}
