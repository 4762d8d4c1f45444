//! CLI error type

use std::path::PathBuf;

use synnerdata_lib::Notice;
use synnerdata_lib::error::Error;
use synnerdata_lib::error::ExportError;
use synnerdata_lib::error::TableError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing setting '{0}' (config file or command line)")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Lib(#[from] Error),
}

impl From<TableError> for CliError {
    fn from(e: TableError) -> Self {
        Self::Lib(e.into())
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        Self::Lib(e.into())
    }
}

impl CliError {
    /// The text shown to the user.
    ///
    /// Request failures get the localized notice; local mistakes keep their
    /// own message.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Lib(e @ (Error::Api(_) | Error::Auth(_))) => Notice::from_error(e),
            other => Notice::error(other.to_string()),
        }
    }
}
