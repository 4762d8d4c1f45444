//! User-facing notices
//!
//! Failures and confirmations reach the user as short, non-blocking
//! messages. A [`Notice`] carries the level and the pt-BR text; turning it
//! into a toast, a status line or stderr output is up to the front end.

use std::fmt;

use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;

/// Fallback for an expired or missing session.
pub const SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";
/// Fallback for failed loads.
pub const LOAD_FAILED: &str = "Não foi possível carregar os dados.";
/// Fallback for requests that never reached the server.
pub const NETWORK_FAILED: &str = "Não foi possível conectar ao servidor.";
/// Fallback for failed exports.
pub const EXPORT_FAILED: &str = "Não foi possível exportar os dados.";
/// Fallback for anything else.
pub const UNEXPECTED: &str = "Ocorreu um erro inesperado.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Picks the text for a failure.
    ///
    /// The server's own message wins when there is one; otherwise a
    /// localized fallback for the kind of failure. The error itself is
    /// logged, so nothing is lost when the fallback hides the detail.
    pub fn from_error(error: &Error) -> Self {
        log::error!("{}", error);

        let message = match error {
            Error::Auth(AuthError::SessionExpired | AuthError::NotAuthenticated) => {
                return Self::warning(SESSION_EXPIRED);
            }
            Error::Api(ApiError::Network(_)) => NETWORK_FAILED.to_string(),
            Error::Api(api) => api
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| LOAD_FAILED.to_string()),
            Error::Export(_) => EXPORT_FAILED.to_string(),
            _ => UNEXPECTED.to_string(),
        };
        Self::error(message)
    }
}

impl From<&Error> for Notice {
    fn from(error: &Error) -> Self {
        Self::from_error(error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    #[test]
    fn test_server_message_wins() {
        let error = Error::Api(ApiError::from_body(409, r#"{"message": "CPF já cadastrado"}"#));
        let notice = Notice::from_error(&error);
        assert_eq!(notice.level, Level::Error);
        assert_eq!(notice.message, "CPF já cadastrado");
    }

    #[test]
    fn test_fallbacks() {
        let notice = Notice::from_error(&Error::Api(ApiError::from_body(500, "")));
        assert_eq!(notice.message, LOAD_FAILED);

        let notice = Notice::from_error(&Error::Auth(AuthError::SessionExpired));
        assert_eq!(notice, Notice::warning(SESSION_EXPIRED));

        let notice = Notice::from_error(&ExportError::invalid_input("x").into());
        assert_eq!(notice.message, EXPORT_FAILED);
    }
}
