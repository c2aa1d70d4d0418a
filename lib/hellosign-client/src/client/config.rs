use serde::Deserialize;

use super::{ApiClient, ApiClientBuilder, ApiClientError, CancelPolicy, SecureString};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "HELLOSIGN_API_KEY";
/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "HELLOSIGN_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "HELLOSIGN_CLIENT_SECRET";
/// Environment variable selecting the development environment (`1`, `true` or `yes`).
pub const ENV_DEV: &str = "HELLOSIGN_DEV";

/// Declarative client configuration.
///
/// Loaded from the environment with [`ClientConfig::from_env`], from any serde
/// source, or from YAML with `from_yaml_str` (`yaml` feature).
///
/// ```rust
/// use hellosign_client::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{ "key": "my-api-key", "dev": true }"#)
///     .expect("valid configuration");
/// let client = config.build().expect("valid client");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API key.
    pub key: Option<SecureString>,
    /// OAuth client id.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<SecureString>,
    /// Use the development environment.
    pub dev: bool,
    /// API base URL override.
    pub base_url: Option<String>,
    /// Behavior on `signature_request.cancel` failures.
    pub cancel_policy: CancelPolicy,
    /// Per-request timeout, in seconds.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Reads `HELLOSIGN_API_KEY`, `HELLOSIGN_CLIENT_ID`, `HELLOSIGN_CLIENT_SECRET`
    /// and `HELLOSIGN_DEV`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value: &String| !value.trim().is_empty());
        let dev = non_blank(ENV_DEV).is_some_and(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });

        Self {
            key: non_blank(ENV_API_KEY).map(SecureString::from),
            client_id: non_blank(ENV_CLIENT_ID),
            client_secret: non_blank(ENV_CLIENT_SECRET).map(SecureString::from),
            dev,
            ..Self::default()
        }
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::AuthConfig`] when the document is not a valid configuration.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ApiClientError> {
        serde_saphyr::from_str(yaml).map_err(|err| ApiClientError::AuthConfig {
            message: format!("invalid YAML configuration: {err}"),
        })
    }

    /// Converts the configuration into a builder for further tuning.
    pub fn into_builder(self) -> ApiClientBuilder {
        let Self {
            key,
            client_id,
            client_secret,
            dev,
            base_url,
            cancel_policy,
            timeout_secs,
        } = self;

        let mut builder = ApiClient::builder()
            .with_dev(dev)
            .with_cancel_policy(cancel_policy);
        if let Some(key) = key {
            builder = builder.with_api_key(key);
        }
        if client_id.is_some() || client_secret.is_some() {
            builder = builder.with_oauth2(
                client_id.unwrap_or_default(),
                client_secret.unwrap_or_else(|| SecureString::from("")),
            );
        }
        if let Some(base_url) = base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(timeout_secs) = timeout_secs {
            builder = builder.with_timeout(std::time::Duration::from_secs(timeout_secs));
        }
        builder
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// See [`ApiClientBuilder::build`].
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        self.into_builder().build()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ErrorKind;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn should_read_api_key_from_env() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "my-api-key"),
            (ENV_DEV, "TRUE"),
        ]));

        assert_eq!(config.key.as_ref().map(SecureString::as_str), Some("my-api-key"));
        assert!(config.dev);
        assert!(config.client_id.is_none());
    }

    #[test]
    fn should_ignore_blank_env_values() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, " "), (ENV_DEV, "0")]));

        assert!(config.key.is_none());
        assert!(!config.dev);
        let error = config.build().expect_err("no credentials");
        assert_eq!(error.kind(), ErrorKind::AuthConfig);
    }

    #[test]
    fn should_build_oauth_client_from_env() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_CLIENT_ID, "client-id"),
            (ENV_CLIENT_SECRET, "client-secret"),
        ]));

        let client = config.build().expect("valid client");

        insta::assert_snapshot!(client, @"ApiClient(https://api.hellosign.com/v3, OAuth2 (client_id: client-id))");
    }

    #[test]
    fn should_deserialize_from_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "key": "my-api-key", "cancel_policy": "swallow", "timeout_secs": 5 }"#,
        )
        .expect("valid config");

        assert_eq!(config.cancel_policy, CancelPolicy::Swallow);
        assert_eq!(config.timeout_secs, Some(5));
        assert!(!format!("{config:?}").contains("my-api-key"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn should_parse_yaml() {
        let config = ClientConfig::from_yaml_str(
            "client_id: client-id\nclient_secret: client-secret\ndev: true\n",
        )
        .expect("valid yaml");

        assert_eq!(config.client_id.as_deref(), Some("client-id"));
        assert!(config.dev);
    }
}
