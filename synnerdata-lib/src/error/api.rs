//! API error types

use super::FieldValidationError;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the raw body when none was given.
        message: String,
        /// Field-scoped validation errors, if the server reported any.
        fields: Vec<FieldValidationError>,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Builds an HTTP error from a response body.
    ///
    /// The backend answers failures with `{ "message": "...", "errors": [...] }`.
    /// When the body is not that shape the raw text becomes the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<serde_json::Value>,
            error: Option<String>,
            #[serde(default)]
            errors: Vec<FieldValidationError>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let message = match parsed.message {
                    Some(serde_json::Value::String(s)) => Some(s),
                    // Some validation layers answer with a list of messages.
                    Some(serde_json::Value::Array(items)) => Some(
                        items
                            .iter()
                            .filter_map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join("; "),
                    ),
                    _ => None,
                }
                .or(parsed.error)
                .unwrap_or_default();
                Self::Http {
                    status,
                    message,
                    fields: parsed.errors,
                }
            }
            Err(_) => Self::http(status, body.trim()),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server-provided message, if non-empty.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Returns the field validation errors reported by the server.
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            Self::Http { fields, .. } => fields,
            _ => &[],
        }
    }
}
