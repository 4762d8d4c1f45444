//! TokenProvider trait and AccessToken

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AuthError;

/// A bearer token with optional expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Reads the expiry from a JWT's `exp` claim.
    ///
    /// The signature is not verified; the backend does that. A token without
    /// `exp` gets no expiry.
    ///
    /// # Example
    ///
    /// ```
    /// use synnerdata_lib::auth::AccessToken;
    ///
    /// // {"alg":"none"}.{"exp":4102444800}.
    /// let jwt = "eyJhbGciOiJub25lIn0.eyJleHAiOjQxMDI0NDQ4MDB9.";
    /// let token = AccessToken::from_jwt(jwt).unwrap();
    /// assert_eq!(token.expires_at.unwrap().timestamp(), 4102444800);
    /// ```
    pub fn from_jwt(jwt: impl Into<String>) -> Result<Self, AuthError> {
        let jwt = jwt.into();
        let mut parts = jwt.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(AuthError::InvalidToken("expected three JWT segments".into())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(format!("payload is not base64url: {}", e)))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::InvalidToken(format!("payload is not JSON: {}", e)))?;

        let expires_at = match claims.exp {
            Some(exp) => Some(
                DateTime::from_timestamp(exp, 0)
                    .ok_or_else(|| AuthError::InvalidToken(format!("exp out of range: {}", exp)))?,
            ),
            None => None,
        };

        Ok(Self {
            access_token: jwt,
            expires_at,
        })
    }

    /// Decodes a JWT when possible, otherwise keeps the token opaque.
    pub fn parse(token: impl Into<String>) -> Self {
        let token = token.into();
        match Self::from_jwt(token.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("treating token as opaque: {}", e);
                Self::new(token)
            }
        }
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Returns the token as a bearer authorization header value.
    pub fn as_bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Supplies tokens to the [`SynnerdataClient`](crate::SynnerdataClient).
///
/// The client calls `get_token` before each request and
/// `on_unauthorized` when the backend answers 401, after which the request
/// fails with [`AuthError::SessionExpired`]. Implementations that hold
/// session state end the session there.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets an access token for the API at `resource` (the base URL).
    async fn get_token(&self, resource: &str) -> Result<AccessToken, AuthError>;

    /// Called once per 401 response with the token the request carried.
    async fn on_unauthorized(&self, _rejected: &AccessToken) {}
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn get_token(&self, resource: &str) -> Result<AccessToken, AuthError> {
        (**self).get_token(resource).await
    }

    async fn on_unauthorized(&self, rejected: &AccessToken) {
        (**self).on_unauthorized(rejected).await
    }
}

/// A token provider that always returns the same static token.
///
/// Useful for testing or for scripts holding a long-lived token.
///
/// # Example
///
/// ```
/// use synnerdata_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _resource: &str) -> Result<AccessToken, AuthError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!("eyJhbGciOiJub25lIn0.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_from_jwt_reads_exp() {
        let token = AccessToken::from_jwt(jwt(r#"{"sub":"u-1","exp":1700000000}"#)).unwrap();
        assert_eq!(token.expires_at.unwrap().timestamp(), 1_700_000_000);
        assert!(token.is_expired());
    }

    #[test]
    fn test_from_jwt_without_exp() {
        let token = AccessToken::from_jwt(jwt(r#"{"sub":"u-1"}"#)).unwrap();
        assert_eq!(token.expires_at, None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_opaque_tokens() {
        assert!(matches!(
            AccessToken::from_jwt("session-token"),
            Err(AuthError::InvalidToken(_))
        ));
        let token = AccessToken::parse("session-token");
        assert_eq!(token.access_token, "session-token");
        assert_eq!(token.expires_at, None);
    }

    #[test]
    fn test_bearer() {
        assert_eq!(AccessToken::new("abc").as_bearer(), "Bearer abc");
    }
}
