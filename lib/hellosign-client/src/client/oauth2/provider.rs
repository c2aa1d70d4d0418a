//! OAuth2 token provider for acquiring and refreshing tokens.

use std::time::Duration;

use oauth2::basic::BasicClient;
use oauth2::{AccessToken, ClientId, ClientSecret, Scope, TokenResponse, TokenUrl};
use tracing::{debug, info};

use super::config::OAuth2Config;
use super::error::OAuth2Error;
use super::token::OAuth2Token;

impl OAuth2Config {
    /// Gets a valid token, acquiring a new one if necessary.
    ///
    /// Callers that find no fresh token queue on the refresh lock; the first
    /// one fetches a token, the others find it in the cache once they get the
    /// lock. This keeps at most one token request in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint cannot be reached or rejects the
    /// client credentials.
    pub async fn get_valid_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        if let Some(token) = self.token_cache.fresh(self.refresh_threshold).await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.token_cache.fresh(self.refresh_threshold).await {
            debug!("token refreshed by a concurrent request");
            return Ok(token);
        }

        let token = self.acquire_client_credentials_token().await?;
        self.token_cache.set(token.clone()).await;
        Ok(token)
    }

    /// Acquires a token using the Client Credentials grant.
    async fn acquire_client_credentials_token(&self) -> Result<OAuth2Token, OAuth2Error> {
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.as_str().to_string()))
            .set_token_uri(TokenUrl::from_url(self.token_url.clone()));

        let mut request = client.exchange_client_credentials();
        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        debug!(token_url = %self.token_url, "requesting OAuth2 token");
        let token_result = request
            .request_async(&self.http_client)
            .await
            .map_err(|e| OAuth2Error::TokenAcquisitionFailed {
                reason: format!("{e}"),
            })?;

        let token =
            Self::convert_token_response(token_result.access_token(), token_result.expires_in());
        info!(client_id = %self.client_id, "OAuth2 token acquired");

        Ok(token)
    }

    fn convert_token_response(
        access_token: &AccessToken,
        expires_in: Option<Duration>,
    ) -> OAuth2Token {
        if let Some(duration) = expires_in {
            OAuth2Token::with_expiry(access_token.secret().clone(), duration)
        } else {
            OAuth2Token::new(access_token.secret().clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuth2Config {
        OAuth2Config::client_credentials("client-id", "secret", "http://127.0.0.1:9/oauth/token")
            .expect("valid builder")
            .build()
            .expect("valid config")
    }

    #[tokio::test]
    async fn should_serve_cached_token_without_network() {
        let config = config();
        config
            .token_cache
            .set(OAuth2Token::with_expiry(
                "cached-token",
                Duration::from_secs(3600),
            ))
            .await;

        let token = config.get_valid_token().await.expect("cached token");
        assert_eq!(token.access_token(), "cached-token");
    }

    #[tokio::test]
    async fn should_report_unreachable_token_endpoint() {
        let config = config();

        let result = config.get_valid_token().await;
        assert!(matches!(
            result,
            Err(OAuth2Error::TokenAcquisitionFailed { .. })
        ));
    }

    #[test]
    fn should_convert_token_response_with_expiry() {
        let token = OAuth2Config::convert_token_response(
            &AccessToken::new("abc".to_string()),
            Some(Duration::from_secs(3600)),
        );
        assert_eq!(token.access_token(), "abc");
        assert!(!token.should_refresh(Duration::from_secs(60)));
    }
}
