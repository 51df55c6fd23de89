//! API token management.
//!
//! Tokens are stored in the system keyring under `user@host`.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use dialoguer::{Password, theme::ColorfulTheme};
use jenkins_views::auth::{CredentialSource, CredentialStore, TOKEN_ENV_VAR, account_key};

use super::KEYRING_SERVICE;
use crate::config::ServerConfig;

#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store an API token for the configured user and server
    Set,
    /// Delete the stored API token
    Delete,
    /// Show where the API token comes from
    Status,
}

pub fn run(args: AuthArgs, server: &ServerConfig) -> Result<()> {
    let user = server
        .username
        .as_deref()
        .context("no Jenkins user configured (set server.username, JENKINS_USER or --user)")?;
    let account = account_key(user, &server.url);
    let store = CredentialStore::new(KEYRING_SERVICE).with_env_fallback();

    match args.command {
        AuthCommands::Set => {
            let token = Password::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("API token for {}", account))
                .interact()?;

            if token.is_empty() {
                bail!("API token cannot be empty");
            }

            store.set(&account, &token)?;
            println!("Stored API token for {}", account);
        }
        AuthCommands::Delete => {
            store.delete(&account)?;
            println!("Deleted API token for {}", account);
        }
        AuthCommands::Status => {
            let source = if server.api_token.is_some() {
                Some("configuration".to_string())
            } else {
                store.credential_source(&account).map(|s| match s {
                    CredentialSource::Keyring => "system keyring".to_string(),
                    CredentialSource::Environment => TOKEN_ENV_VAR.to_string(),
                })
            };
            match source {
                Some(source) => println!("{}: token from {}", account, source),
                None => println!("{}: no token found", account),
            }
        }
    }

    Ok(())
}
