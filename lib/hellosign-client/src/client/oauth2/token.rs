//! OAuth2 token types and caching.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An OAuth2 access token with expiration tracking.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OAuth2Token {
    access_token: String,
    #[zeroize(skip)]
    expires_at: Option<Instant>,
}

impl OAuth2Token {
    /// Creates a token without a known expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a token expiring after `expires_in`.
    pub fn with_expiry(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(Instant::now() + expires_in),
        }
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Checks if the token is expired.
    ///
    /// Returns `false` if the token has no expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }

    /// Returns `true` if the token will expire within the given threshold.
    pub fn should_refresh(&self, threshold: Duration) -> bool {
        self.expires_at
            .is_some_and(|exp| Instant::now() + threshold >= exp)
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Shared cache holding the current token.
///
/// Readers never block each other; a refresh replaces the whole token.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenCache {
    inner: Arc<RwLock<Option<OAuth2Token>>>,
}

impl TokenCache {
    /// Returns the cached token if it is still usable for `threshold`.
    pub(crate) async fn fresh(&self, threshold: Duration) -> Option<OAuth2Token> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|token| !token.is_expired() && !token.should_refresh(threshold))
            .cloned()
    }

    pub(crate) async fn set(&self, token: OAuth2Token) {
        let mut guard = self.inner.write().await;
        *guard = Some(token);
    }

    /// Drops the cached token if it is still `access_token`.
    ///
    /// Returns `false` when another request already replaced it.
    pub(crate) async fn clear_if(&self, access_token: &str) -> bool {
        let mut guard = self.inner.write().await;
        if guard
            .as_ref()
            .is_some_and(|token| token.access_token() == access_token)
        {
            *guard = None;
            return true;
        }
        false
    }
}
