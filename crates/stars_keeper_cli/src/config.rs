//! Configuration file support for stars-keeper.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARS_KEEPER_`, nested keys joined
//!    with `__`, e.g. `STARS_KEEPER_SYNC__PAGE_SIZE`)
//! 3. Local config file (./stars-keeper.toml)
//! 4. User config file (~/.config/stars-keeper/config.toml)
//! 5. Built-in defaults
//!
//! `GITHUB_TOKEN` is used when no token is configured any other way.
//!
//! The database defaults to `main.db` in the user config directory
//! (`~/.config/stars-keeper/main.db` on Linux).
//!
//! Example config file:
//! ```toml
//! [database]
//! path = "/var/lib/stars-keeper/main.db"  # optional
//!
//! [github]
//! token = "ghp_..."  # or use STARS_KEEPER_GITHUB__TOKEN / GITHUB_TOKEN
//! api_url = "https://github.example.com/api/v3"  # GitHub Enterprise
//!
//! [sync]
//! page_size = 50
//! fetch_readme = true
//! identity_scheme = "digest"  # or "legacy"
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat, Map};
use directories::ProjectDirs;
use serde::Deserialize;
use stars_keeper::IdentityScheme;
use stars_keeper::sync::{DEFAULT_PAGE_SIZE, SyncOptions};

/// Name used for the config directory and local config file.
const APP_NAME: &str = "stars-keeper";

/// Environment variable consulted when no GitHub token is configured.
const LEGACY_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Default sync options.
    pub sync: SyncConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    pub path: Option<PathBuf>,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// API root, for GitHub Enterprise.
    pub api_url: Option<String>,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Starred repositories requested per page.
    pub page_size: u32,
    /// Whether to fetch each repository's README.
    pub fetch_readme: bool,
    /// How star identifiers are derived.
    pub identity_scheme: IdentityScheme,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_readme: true,
            identity_scheme: IdentityScheme::Digest,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. User config file (~/.config/stars-keeper/config.toml)
    /// 3. Local config file (./stars-keeper.toml)
    /// 4. Environment variables with STARS_KEEPER_ prefix
    /// 5. `GITHUB_TOKEN`, if no token was set above
    ///
    /// # Errors
    /// Returns `ConfigError` if a config file cannot be parsed or any value is
    /// invalid. Nothing falls back to defaults in that case.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(None)
    }

    /// Load configuration, reading `STARS_KEEPER_*` variables from `env`
    /// instead of the process environment when given.
    fn load_with_env(env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(user_config) = Self::default_config_path()
            && user_config.exists()
        {
            tracing::debug!("Loading config from {:?}", user_config);
            builder = builder.add_source(
                File::from(user_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from(format!("{APP_NAME}.toml"));
        if local_config.exists() {
            tracing::debug!("Loading config from {:?}", local_config);
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., STARS_KEEPER_SYNC__PAGE_SIZE -> sync.page_size
        builder = builder.add_source(
            Environment::with_prefix("STARS_KEEPER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config.with_legacy_token(std::env::var(LEGACY_TOKEN_VAR).ok()))
    }

    /// Fill in the GitHub token from `legacy` when none is configured.
    fn with_legacy_token(mut self, legacy: Option<String>) -> Self {
        if self.github.token.is_none() {
            self.github.token = legacy.filter(|token| !token.trim().is_empty());
        }
        self
    }

    /// Get the database path, falling back to `main.db` in the config directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database
            .path
            .clone()
            .or_else(|| Self::default_config_dir().map(|dir| dir.join("main.db")))
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Sync options from the `[sync]` section.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            page_size: self.sync.page_size,
            fetch_readme: self.sync.fetch_readme,
            identity_scheme: self.sync.identity_scheme,
        }
    }

    /// Get the user config directory.
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }
}
