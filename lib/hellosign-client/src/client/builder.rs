use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tracing::debug;
use url::Url;

use super::oauth2::OAuth2Config;
use super::{ApiClient, ApiClientError, CancelPolicy, ClientInner, Credentials, SecureString};

/// Production API base URL.
pub const PRODUCTION_BASE_URL: &str = "https://api.hellosign.com/v3";
/// Development API base URL, selected with [`ApiClientBuilder::with_dev`].
pub const DEV_BASE_URL: &str = "https://api.dev-hellosign.com/v3";
/// Production OAuth token endpoint.
pub const PRODUCTION_TOKEN_URL: &str = "https://app.hellosign.com/oauth/token";
/// Development OAuth token endpoint.
pub const DEV_TOKEN_URL: &str = "https://app.dev-hellosign.com/oauth/token";

const DEFAULT_USER_AGENT: &str = concat!("hellosign-client/", env!("CARGO_PKG_VERSION"));

/// Builder for creating [`ApiClient`] instances.
///
/// Exactly one credential mode is used: an API key when one is set, otherwise
/// OAuth client credentials. [`build`](Self::build) fails with
/// [`ApiClientError::AuthConfig`] when neither is complete.
///
/// # Default Configuration
///
/// - **Base URL**: [`PRODUCTION_BASE_URL`] ([`DEV_BASE_URL`] with `with_dev(true)`)
/// - **Token URL**: [`PRODUCTION_TOKEN_URL`] ([`DEV_TOKEN_URL`] with `with_dev(true)`)
/// - **Timeout**: none beyond the transport's
/// - **Cancel policy**: [`CancelPolicy::Surface`]
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use hellosign_client::{ApiClient, CancelPolicy};
///
/// # fn example() -> Result<(), hellosign_client::ApiClientError> {
/// let client = ApiClient::builder()
///     .with_api_key("c4fe2f4b0a4ab7bfb8e0c2a6a1bb2c5dd3c71ba2d8d4f0f03fd6bbd1cb3e1a6f")
///     .with_dev(true)
///     .with_timeout(Duration::from_secs(30))
///     .with_cancel_policy(CancelPolicy::Swallow)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ApiClientBuilder {
    api_key: Option<SecureString>,
    client_id: Option<String>,
    client_secret: Option<SecureString>,
    scopes: Vec<String>,
    dev: bool,
    base_url: Option<String>,
    token_url: Option<String>,
    client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    cancel_policy: CancelPolicy,
    refresh_threshold: Option<Duration>,
}

impl ApiClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::AuthConfig`] when neither an API key nor both OAuth
    ///   client id and secret are provided, or when the OAuth setup is invalid
    /// - [`ApiClientError::UrlError`] for an invalid base URL
    /// - [`ApiClientError::InvalidHeaderValue`] for an invalid user agent
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            api_key,
            client_id,
            client_secret,
            scopes,
            dev,
            base_url,
            token_url,
            client,
            timeout,
            user_agent,
            cancel_policy,
            refresh_threshold,
        } = self;

        let base_url = base_url.unwrap_or_else(|| {
            if dev { DEV_BASE_URL } else { PRODUCTION_BASE_URL }.to_string()
        });
        let base_url = base_url.parse::<Url>()?;

        let user_agent = match user_agent {
            Some(user_agent) => HeaderValue::from_str(&user_agent)?,
            None => HeaderValue::from_static(DEFAULT_USER_AGENT),
        };

        let credentials = match (api_key.filter(|key| !key.is_blank()), client_id, client_secret) {
            (Some(key), client_id, _) => {
                if client_id.is_some() {
                    debug!("API key set, OAuth client credentials ignored");
                }
                Credentials::ApiKey(key)
            }
            (None, Some(client_id), Some(client_secret))
                if !client_id.trim().is_empty() && !client_secret.is_blank() =>
            {
                let token_url = token_url.unwrap_or_else(|| {
                    if dev { DEV_TOKEN_URL } else { PRODUCTION_TOKEN_URL }.to_string()
                });
                let mut builder = OAuth2Config::client_credentials(client_id, client_secret, token_url)
                    .map_err(auth_config)?;
                for scope in scopes {
                    builder = builder.add_scope(scope);
                }
                if let Some(threshold) = refresh_threshold {
                    builder = builder.with_refresh_threshold(threshold);
                }
                if let Some(client) = &client {
                    builder = builder.with_http_client(client.clone());
                }
                Credentials::OAuth2(builder.build().map_err(auth_config)?.into())
            }
            (None, None, None) => {
                return Err(ApiClientError::AuthConfig {
                    message: "an API key or OAuth client credentials are required".to_string(),
                });
            }
            (None, _, _) => {
                return Err(ApiClientError::AuthConfig {
                    message: "OAuth requires both a client id and a client secret".to_string(),
                });
            }
        };

        let http = match client {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };

        debug!(%base_url, %credentials, "client ready");
        let inner = ClientInner {
            http,
            base_url,
            credentials,
            user_agent,
            timeout,
            cancel_policy,
        };
        Ok(ApiClient {
            inner: Arc::new(inner),
        })
    }

    /// Authenticates with an API key (HTTP Basic, key as user name).
    ///
    /// Takes precedence over OAuth client credentials.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<SecureString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Authenticates with OAuth client credentials (Bearer token).
    #[must_use]
    pub fn with_oauth2(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Adds an OAuth scope to request with the token.
    #[must_use]
    pub fn add_oauth2_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Targets the development environment.
    #[must_use]
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Overrides the API base URL, e.g. to point at a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Overrides the OAuth token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Uses a custom HTTP client, shared with OAuth token requests.
    #[must_use]
    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets a timeout applied to every request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Chooses what happens when `signature_request.cancel` fails.
    #[must_use]
    pub fn with_cancel_policy(mut self, cancel_policy: CancelPolicy) -> Self {
        self.cancel_policy = cancel_policy;
        self
    }

    /// Sets how long before expiry an OAuth token is refreshed (default 60 s).
    #[must_use]
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = Some(threshold);
        self
    }
}

fn auth_config(error: super::oauth2::OAuth2Error) -> ApiClientError {
    ApiClientError::AuthConfig {
        message: error.to_string(),
    }
}

impl Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("api_key", &self.api_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("dev", &self.dev)
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .field("cancel_policy", &self.cancel_policy)
            .finish_non_exhaustive()
    }
}
