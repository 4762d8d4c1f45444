//! Authentication error types

/// Errors that end or prevent an authenticated session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The backend answered 401, or the token expired locally.
    ///
    /// The session has already been signed out when this is returned.
    #[error("Session expired")]
    SessionExpired,

    /// No token is available; the user never signed in or signed out.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The token could not be decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}
