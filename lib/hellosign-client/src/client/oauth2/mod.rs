//! OAuth2 client-credentials support.
//!
//! The client mints a bearer token at the service token endpoint, caches it
//! until shortly before it expires and refreshes it transparently. Concurrent
//! requests arriving while no valid token is cached share a single refresh.
//!
//! # Example
//!
//! ```rust,no_run
//! use hellosign_client::ApiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder()
//!     .with_oauth2("client-id", "client-secret")
//!     .build()?;
//!
//! // Token acquired automatically on first request
//! let templates = client.template().list().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod provider;
mod token;

pub use self::config::{OAuth2Config, OAuth2ConfigBuilder, SharedOAuth2Config};
pub use self::error::OAuth2Error;
pub use self::token::OAuth2Token;
