//! CLI configuration
//!
//! Read from a TOML file: `--config PATH`, or `config.toml` in the platform
//! config directory (`~/.config/synnerdata` on Linux). `SYNNERDATA_TOKEN`
//! overrides the stored token.

use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;
use simplelog::LevelFilter;

use crate::error::CliError;

const QUALIFIER: &str = "br.com";
const ORGANIZATION: &str = "synnerdata";
const APPLICATION: &str = "synnerdata";

/// Environment variable holding the session token.
pub const TOKEN_ENV: &str = "SYNNERDATA_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// API base URL, e.g. `https://api.synnerdata.com.br`.
    pub api_url: Option<String>,
    /// Session token (JWT or opaque).
    pub token: Option<String>,
    /// Company used when a command needs one and none is given.
    pub company_id: Option<String>,
    pub page_size: Option<usize>,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Option<String>,
}

/// Default config file location, if a home directory exists.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl CliConfig {
    /// Loads the config.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// default config.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => match default_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env_token(std::env::var(TOKEN_ENV).ok()))
    }

    fn read(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces the token when the environment provides a non-empty one.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        self
    }

    /// Log level from the config; `warn` when unset or unknown.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Warn)
    }
}
