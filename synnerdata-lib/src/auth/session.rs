//! Explicit session context.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;

use super::AccessToken;
use super::TokenProvider;
use crate::error::AuthError;

/// The signed-in user as the backend describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Company the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// The user signed out.
    Manual,
    /// The backend rejected the token with 401.
    Unauthorized,
    /// The token's own expiry passed.
    Expired,
}

impl fmt::Display for SignOutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignOutReason::Manual => f.write_str("manual"),
            SignOutReason::Unauthorized => f.write_str("unauthorized"),
            SignOutReason::Expired => f.write_str("expired"),
        }
    }
}

type SignOutHook = Arc<dyn Fn(SignOutReason) + Send + Sync>;

#[derive(Debug, Clone)]
struct Active {
    token: AccessToken,
    user: Option<User>,
}

/// The one place a credential lives.
///
/// Services receive the session (through the client) instead of reading a
/// stored token themselves. Ending the session, for any reason, runs the
/// sign-out hook exactly once.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use synnerdata_lib::auth::Session;
///
/// let session = Arc::new(Session::new().on_sign_out(|reason| {
///     eprintln!("signed out: {}", reason);
/// }));
/// ```
pub struct Session {
    active: RwLock<Option<Active>>,
    hook: Option<SignOutHook>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(None),
            hook: None,
        }
    }

    /// Creates a session that is already signed in.
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            active: RwLock::new(Some(Active { token, user: None })),
            hook: None,
        }
    }

    /// Sets the sign-out hook.
    pub fn on_sign_out<F>(mut self, hook: F) -> Self
    where
        F: Fn(SignOutReason) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Starts a session, replacing any previous one without firing the hook.
    pub async fn sign_in(&self, token: AccessToken, user: Option<User>) {
        let mut active = self.active.write().await;
        match &user {
            Some(user) => log::info!("signed in as {}", user.email),
            None => log::info!("signed in"),
        }
        *active = Some(Active { token, user });
    }

    /// Ends the session. Returns `false` when there was none.
    pub async fn sign_out(&self, reason: SignOutReason) -> bool {
        let ended = self.active.write().await.take().is_some();
        if ended {
            log::info!("session ended ({})", reason);
            if let Some(hook) = &self.hook {
                hook(reason);
            }
        }
        ended
    }

    pub async fn is_authenticated(&self) -> bool {
        self.active
            .read()
            .await
            .as_ref()
            .is_some_and(|a| !a.token.is_expired())
    }

    /// The signed-in user, if the backend supplied one.
    pub async fn user(&self) -> Option<User> {
        self.active.read().await.as_ref().and_then(|a| a.user.clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for Session {
    async fn get_token(&self, _resource: &str) -> Result<AccessToken, AuthError> {
        let token = {
            let active = self.active.read().await;
            match active.as_ref() {
                Some(a) => a.token.clone(),
                None => return Err(AuthError::NotAuthenticated),
            }
        };

        if token.is_expired() {
            self.sign_out(SignOutReason::Expired).await;
            return Err(AuthError::SessionExpired);
        }
        Ok(token)
    }

    async fn on_unauthorized(&self, rejected: &AccessToken) {
        let current = {
            let active = self.active.read().await;
            active
                .as_ref()
                .is_some_and(|a| a.token.access_token == rejected.access_token)
        };
        // a 401 for a token already replaced by sign_in leaves the new one alone
        if current {
            self.sign_out(SignOutReason::Unauthorized).await;
        } else {
            log::debug!("ignoring 401 for a superseded token");
        }
    }
}
