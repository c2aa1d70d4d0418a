use std::fmt;

use base64::Engine;
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ApiClientError;
use super::oauth2::SharedOAuth2Config;

/// Errors that can occur while turning credentials into an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// Bearer token contains invalid characters for HTTP headers.
    #[display("Bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Description of the invalid characters or format issue.
        message: String,
    },

    /// API key contains invalid characters for HTTP headers.
    #[display("API key contains invalid characters: {message}")]
    InvalidApiKey {
        /// Description of the invalid characters or format issue.
        message: String,
    },
}

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the secret is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Masks sensitive data for display/logging purposes.
    fn mask_sensitive(value: &str) -> String {
        if value.len() <= 8 {
            "***".to_string()
        } else {
            let head = value.get(..4).unwrap_or_default();
            let tail = value.get(value.len() - 4..).unwrap_or_default();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Credentials used by the client, fixed for the lifetime of the client.
///
/// - `ApiKey` sends `Authorization: Basic base64("<key>:")`
/// - `OAuth2` sends `Authorization: Bearer <token>`, the token being minted
///   through the client-credentials grant and cached until near expiry.
#[derive(Clone)]
pub enum Credentials {
    /// API key used as the Basic-auth username with an empty password.
    ApiKey(SecureString),

    /// OAuth2 client credentials with a shared token cache.
    OAuth2(SharedOAuth2Config),
}

impl Credentials {
    /// Produces the `Authorization` header value for one outgoing request.
    ///
    /// In OAuth2 mode this may issue a single token request; concurrent callers
    /// wait for the same in-flight refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be acquired or the header value
    /// contains invalid characters.
    pub async fn header(&self) -> Result<HeaderValue, ApiClientError> {
        match self {
            Self::ApiKey(key) => {
                let credentials =
                    base64::engine::general_purpose::STANDARD.encode(format!("{}:", key.as_str()));
                let mut value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(
                    |err| AuthenticationError::InvalidApiKey {
                        message: err.to_string(),
                    },
                )?;
                value.set_sensitive(true);
                Ok(value)
            }
            Self::OAuth2(config) => {
                let token = config.get_valid_token().await?;
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.access_token()))
                    .map_err(|err| AuthenticationError::InvalidBearerToken {
                        message: err.to_string(),
                    })?;
                value.set_sensitive(true);
                Ok(value)
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[REDACTED]").finish(),
            Self::OAuth2(config) => f.debug_tuple("OAuth2").field(config).finish(),
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(key) => write!(f, "ApiKey ({key})"),
            Self::OAuth2(config) => write!(f, "OAuth2 (client_id: {})", config.client_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_encode_api_key_as_basic_username() {
        let credentials = Credentials::ApiKey("abc".into());
        let header = credentials.header().await.expect("header");

        // "abc:" base64 encoded is "YWJjOg=="
        assert_eq!(header, "Basic YWJjOg==");
        assert!(header.is_sensitive());
    }

    #[tokio::test]
    async fn should_encode_api_key_with_control_characters() {
        let credentials = Credentials::ApiKey("\n".into());
        let header = credentials.header().await.expect("header");

        // "\n:" base64 encoded is "Cjo="
        assert_eq!(header, "Basic Cjo=");
    }

    #[test]
    fn test_display_masks_secrets() {
        let credentials = Credentials::ApiKey("secret-key-12345".into());
        assert_eq!(credentials.to_string(), "ApiKey (secr...2345)");

        let debug_str = format!("{credentials:?}");
        assert!(!debug_str.contains("secret-key"));
    }

    #[test]
    fn test_secure_string_mask_short_tokens() {
        assert_eq!(SecureString::mask_sensitive("short"), "***");
        assert_eq!(SecureString::mask_sensitive("12345678"), "***");
        assert_eq!(SecureString::mask_sensitive("123456789"), "1234...6789");
    }

    #[test]
    fn test_secure_string_debug() {
        let secure = SecureString::new("secret-password".to_string());
        let debug_str = format!("{secure:?}");
        assert_eq!(debug_str, "SecureString { value: \"[REDACTED]\" }");
    }

    #[test]
    fn test_secure_string_blank() {
        assert!(SecureString::from("  ").is_blank());
        assert!(!SecureString::from("key").is_blank());
    }
}
