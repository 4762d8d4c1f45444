//! Error types

mod api;
mod auth;
mod export;
mod field;
mod table;
mod validation;

pub use api::*;
pub use auth::*;
pub use export::*;
pub use field::*;
pub use table::*;
pub use validation::*;

/// Top-level error returned by the client and the table store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request reached the backend (or tried to) and failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session is missing or no longer valid.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The table schema or view-state was misused.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Export input was malformed or the workbook could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation cannot be performed with the given arguments.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Returns `true` if this error ended the session.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Auth(AuthError::SessionExpired))
    }

    /// Returns the message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.server_message(),
            _ => None,
        }
    }
}
