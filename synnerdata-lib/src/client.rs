//! Main SynnerdataClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::response;

/// Path prefix of the Synnerdata REST API.
pub const DEFAULT_API_PREFIX: &str = "/v1";

/// Authenticated client for the Synnerdata REST API.
///
/// Every request carries the bearer token from the [`TokenProvider`]. A 401
/// answer calls [`TokenProvider::on_unauthorized`] (a [`Session`] signs out
/// there) and fails with [`AuthError::SessionExpired`]. Requests are never
/// retried.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// [`Session`]: crate::auth::Session
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use synnerdata_lib::SynnerdataClient;
/// use synnerdata_lib::auth::{AccessToken, Session};
/// use synnerdata_lib::model::Resource;
///
/// let session = Arc::new(Session::with_token(AccessToken::parse(token)));
/// let client = SynnerdataClient::builder()
///     .url("https://api.synnerdata.com.br")
///     .token_provider(Arc::clone(&session))
///     .build()?;
///
/// let employees = client.list_by_company(&Resource::Employees, company_id).await?;
/// ```
#[derive(Clone)]
pub struct SynnerdataClient {
    inner: Arc<SynnerdataClientInner>,
}

struct SynnerdataClientInner {
    base_url: Url,
    api_prefix: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl SynnerdataClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> SynnerdataClientBuilder<Missing, Missing> {
        SynnerdataClientBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the path prefix put before every request path.
    pub fn api_prefix(&self) -> &str {
        &self.inner.api_prefix
    }

    /// Sends an authenticated request and returns the successful response.
    ///
    /// `path` is relative to the API prefix (`/employees/42`). Non-2xx
    /// answers become errors; the body of a failed request is parsed for the
    /// server's message and field errors.
    pub async fn fetch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path)?;
        let body = body.map(serde_json::to_string).transpose()?;

        let token = self
            .inner
            .token_provider
            .get_token(self.inner.base_url.as_str())
            .await?;

        log::debug!("{} {}", method, url.path());

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .headers(default_headers())
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            log::warn!("{} {} failed: {}", method, url.path(), e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("{} {} answered 401, ending session", method, url.path());
            self.inner.token_provider.on_unauthorized(&token).await;
            return Err(AuthError::SessionExpired.into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_body(status.as_u16(), &body);
            log::warn!("{} {} answered {}", method, url.path(), error);
            return Err(error.into());
        }

        Ok(response)
    }

    /// Like [`fetch`](Self::fetch), decoding the JSON answer.
    ///
    /// A `{ "data": ... }` envelope is unwrapped; an empty body decodes as
    /// JSON `null`.
    pub async fn fetch_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.fetch(method, path, body).await?;
        let text = response.text().await.map_err(ApiError::from)?;
        Ok(response::decode(&text)?)
    }

    fn build_url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let prefix = self.inner.api_prefix.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let joined = format!("{}{}/{}", base, prefix, path);
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
    }
}

impl std::fmt::Debug for SynnerdataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynnerdataClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_prefix", &self.inner.api_prefix)
            .finish_non_exhaustive()
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`SynnerdataClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The API base URL
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct SynnerdataClientBuilder<U, P> {
    url: U,
    token_provider: P,
    api_prefix: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl SynnerdataClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for SynnerdataClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SynnerdataClientBuilder<Missing, P> {
    /// Sets the API base URL.
    pub fn url(self, url: impl Into<String>) -> SynnerdataClientBuilder<Set<String>, P> {
        SynnerdataClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            api_prefix: self.api_prefix,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> SynnerdataClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    ///
    /// Pass an `Arc<Session>` to keep a handle on the session.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> SynnerdataClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        SynnerdataClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            api_prefix: self.api_prefix,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> SynnerdataClientBuilder<U, P> {
    /// Sets the path prefix.
    ///
    /// Defaults to `/v1`.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl SynnerdataClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`SynnerdataClient`].
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be created.
    pub fn build(self) -> Result<SynnerdataClient, ApiError> {
        let base_url = Url::parse(&self.url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(SynnerdataClient {
            inner: Arc::new(SynnerdataClientInner {
                base_url,
                api_prefix: self.api_prefix,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
