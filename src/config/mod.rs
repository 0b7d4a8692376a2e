//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pullscope.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PULLSCOPE_*`, or legacy `GITHUB_TOKEN` for
//!    the token
//! 4. **Command-line arguments** – `--token`/`-t`, `--user-id`/`-i`,
//!    `--uid`/`-u` and friends
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! user_id = 17
//! uid = "583231"
//! api_base = "https://api.github.com"
//! database_url = "pullscope.sqlite"
//! response_cache_ttl_seconds = 900
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::RetrievalError;
use crate::github::user::{
    ApiBase, DEFAULT_API_BASE, LocalUserId, PersonalAccessToken, RemoteUid, User,
};

/// Default lifetime of a cached GitHub response: 15 minutes.
pub const DEFAULT_RESPONSE_CACHE_TTL_SECONDS: u64 = 900;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PULLSCOPE_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PULLSCOPE_USER_ID` or `--user-id`: Local application user id
/// - `PULLSCOPE_UID` or `--uid`: GitHub uid of the user
/// - `PULLSCOPE_API_BASE` or `--api-base`: GitHub REST API base URL
/// - `PULLSCOPE_DATABASE_URL` or `--database-url`: Shared `SQLite` cache path
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pullscope::PullscopeConfig;
///
/// let config = PullscopeConfig::load().expect("failed to load configuration");
/// let user = config.require_user().expect("user required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PULLSCOPE",
    discovery(
        dotfile_name = ".pullscope.toml",
        config_file_name = "pullscope.toml",
        app_name = "pullscope"
    )
)]
pub struct PullscopeConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PULLSCOPE_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Local application identifier of the user. Scopes the shared cache key.
    ///
    /// Can be provided via:
    /// - CLI: `--user-id <ID>` or `-i <ID>`
    /// - Environment: `PULLSCOPE_USER_ID`
    /// - Config file: `user_id = 17`
    #[ortho_config(cli_short = 'i')]
    pub user_id: Option<u64>,

    /// GitHub uid of the user, used to derive the GraphQL node id.
    ///
    /// Can be provided via:
    /// - CLI: `--uid <UID>` or `-u <UID>`
    /// - Environment: `PULLSCOPE_UID`
    /// - Config file: `uid = "..."`
    #[ortho_config(cli_short = 'u')]
    pub uid: Option<String>,

    /// GitHub REST API base URL. Enterprise hosts use
    /// `https://<host>/api/v3`.
    ///
    /// Defaults to `https://api.github.com`.
    pub api_base: Option<String>,

    /// `SQLite` database path used as the shared response cache.
    ///
    /// When absent, responses are cached in memory for the lifetime of the
    /// process only.
    ///
    /// Can be provided via:
    /// - CLI: `--database-url <PATH>`
    /// - Environment: `PULLSCOPE_DATABASE_URL`
    /// - Config file: `database_url = "..."`
    pub database_url: Option<String>,

    /// Runs database migrations and exits.
    ///
    /// When set, the database at `database_url` is created or upgraded, the
    /// schema version is recorded in telemetry, and no GitHub call is made.
    #[ortho_config()]
    pub migrate_db: bool,

    /// TTL for cached GitHub responses, in seconds.
    ///
    /// Defaults to 15 minutes.
    #[ortho_config()]
    pub response_cache_ttl_seconds: u64,
}

impl Default for PullscopeConfig {
    fn default() -> Self {
        Self {
            token: None,
            user_id: None,
            uid: None,
            api_base: None,
            database_url: None,
            migrate_db: false,
            response_cache_ttl_seconds: DEFAULT_RESPONSE_CACHE_TTL_SECONDS,
        }
    }
}

impl PullscopeConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::MissingToken`] when no token source provides
    /// a value.
    pub fn resolve_token(&self) -> Result<String, RetrievalError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(RetrievalError::MissingToken)
    }

    /// Builds the user whose pull requests should be loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Configuration`] when the local user id is
    /// missing, [`RetrievalError::MissingUid`] when the uid is missing or
    /// blank, and [`RetrievalError::MissingToken`] when no token is available.
    pub fn require_user(&self) -> Result<User, RetrievalError> {
        let id = self
            .user_id
            .map(LocalUserId::new)
            .ok_or_else(|| RetrievalError::Configuration {
                message: "local user id is required (use --user-id or -i)".to_owned(),
            })?;
        let uid = RemoteUid::new(self.uid.as_deref().unwrap_or_default())?;
        let token = PersonalAccessToken::new(self.resolve_token()?)?;
        Ok(User::new(id, uid, token))
    }

    /// Returns the configured API base, or the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InvalidApiBase`] when the value cannot be
    /// parsed.
    pub fn api_base(&self) -> Result<ApiBase, RetrievalError> {
        ApiBase::parse(self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))
    }

    /// Returns the database URL required for `--migrate-db`.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Configuration`] when no database URL is set.
    pub fn require_database_url(&self) -> Result<&str, RetrievalError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| RetrievalError::Configuration {
                message: "database URL is required (use --database-url or \
                          PULLSCOPE_DATABASE_URL)"
                    .to_owned(),
            })
    }

    /// How long GitHub responses stay in the shared cache.
    #[must_use]
    pub const fn response_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.response_cache_ttl_seconds)
    }
}

#[cfg(test)]
mod tests;
