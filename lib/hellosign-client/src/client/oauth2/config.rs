//! OAuth2 configuration and builder.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use url::Url;

use super::error::OAuth2Error;
use super::token::TokenCache;
use crate::client::SecureString;

/// Default threshold for token refresh (60 seconds before expiry).
const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

/// OAuth2 client-credentials configuration with its token cache.
///
/// Use [`OAuth2ConfigBuilder`] to create instances.
pub struct OAuth2Config {
    pub(crate) client_id: String,
    pub(crate) client_secret: SecureString,
    pub(crate) token_url: Url,
    pub(crate) scopes: Vec<String>,
    pub(crate) refresh_threshold: Duration,
    pub(crate) token_cache: TokenCache,
    /// Serializes token refreshes: at most one token request in flight.
    pub(crate) refresh_lock: Mutex<()>,
    pub(crate) http_client: reqwest::Client,
}

impl OAuth2Config {
    /// Creates a builder for the client-credentials flow.
    ///
    /// # Errors
    ///
    /// Returns an error if `token_url` is not a valid URL.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        token_url: impl AsRef<str>,
    ) -> Result<OAuth2ConfigBuilder, OAuth2Error> {
        OAuth2ConfigBuilder::new(client_id, client_secret, token_url)
    }

    /// Returns the OAuth2 client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .field("refresh_threshold", &self.refresh_threshold)
            .finish_non_exhaustive()
    }
}

/// Cheaply cloneable handle on an [`OAuth2Config`].
///
/// All clones share the same token cache and refresh lock.
#[derive(Debug, Clone)]
pub struct SharedOAuth2Config(pub(crate) Arc<OAuth2Config>);

impl Deref for SharedOAuth2Config {
    type Target = OAuth2Config;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<OAuth2Config> for SharedOAuth2Config {
    fn from(config: OAuth2Config) -> Self {
        Self(Arc::new(config))
    }
}

/// Builder for OAuth2 configuration.
#[derive(Clone)]
pub struct OAuth2ConfigBuilder {
    client_id: String,
    client_secret: SecureString,
    token_url: Url,
    scopes: Vec<String>,
    refresh_threshold: Duration,
    http_client: Option<reqwest::Client>,
}

impl OAuth2ConfigBuilder {
    /// Creates a new builder with required parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `token_url` is not a valid URL.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        token_url: impl AsRef<str>,
    ) -> Result<Self, OAuth2Error> {
        let token_url =
            Url::parse(token_url.as_ref()).map_err(|e| OAuth2Error::InvalidTokenEndpoint {
                url: token_url.as_ref().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url,
            scopes: Vec::new(),
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            http_client: None,
        })
    }

    /// Adds a scope to request.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Sets how long before expiry a token gets refreshed.
    #[must_use]
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    /// Uses a custom HTTP client for token requests.
    ///
    /// The default client does not follow redirects.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client id or secret is blank, or if the token
    /// HTTP client cannot be created.
    pub fn build(self) -> Result<OAuth2Config, OAuth2Error> {
        let Self {
            client_id,
            client_secret,
            token_url,
            scopes,
            refresh_threshold,
            http_client,
        } = self;

        if client_id.trim().is_empty() {
            return Err(OAuth2Error::ConfigurationError {
                reason: "missing client_id".to_string(),
            });
        }
        if client_secret.is_blank() {
            return Err(OAuth2Error::ConfigurationError {
                reason: "missing client_secret".to_string(),
            });
        }

        let http_client = match http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .map_err(|err| OAuth2Error::ConfigurationError {
                    reason: format!("cannot create token HTTP client: {err}"),
                })?,
        };

        Ok(OAuth2Config {
            client_id,
            client_secret,
            token_url,
            scopes,
            refresh_threshold,
            token_cache: TokenCache::default(),
            refresh_lock: Mutex::new(()),
            http_client,
        })
    }
}

impl fmt::Debug for OAuth2ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2ConfigBuilder")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
