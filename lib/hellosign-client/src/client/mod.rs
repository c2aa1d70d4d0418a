use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

mod builder;
pub use self::builder::{
    ApiClientBuilder, DEV_BASE_URL, DEV_TOKEN_URL, PRODUCTION_BASE_URL, PRODUCTION_TOKEN_URL,
};

mod config;
pub use self::config::{ClientConfig, ENV_API_KEY, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_DEV};

mod args;
pub use self::args::{CallArgs, FileRef};

mod descriptor;
pub use self::descriptor::{BodyEncoding, Hook, Operation, ResourceDescriptor, ResponseKind};

mod path;
mod body;
mod request;

mod call;
pub use self::call::{ApiResult, CancelPolicy, Dispatch};

mod response;
pub use self::response::{ApiResponse, DownloadStream};

mod resources;
pub use self::resources::{EmbeddedApi, SignatureRequestApi, TemplateApi};

mod auth;
pub use self::auth::{AuthenticationError, Credentials, SecureString};

pub mod oauth2;

mod error;
pub use self::error::{ApiClientError, ErrorKind};

use self::request::RequestPlan;

/// State shared by every call of one client.
pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) credentials: Credentials,
    pub(crate) user_agent: HeaderValue,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancel_policy: CancelPolicy,
}

/// Client for the signature service REST API.
///
/// Cloning is cheap: clones share the connection pool and, in OAuth mode, the
/// token cache. Independent clients share nothing.
///
/// Every operation returns a [`Dispatch`], consumed either with `.await` or
/// with [`Dispatch::on_complete`].
///
/// # Example
///
/// ```rust,no_run
/// use hellosign_client::{ApiClient, CallArgs};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder().with_api_key("my-api-key").build()?;
///
/// // Look the template up, then send from it
/// let template = client.template().get("c26b8a16784a872da37ea946b9ddec7c1e11dff6").await?;
/// let response = client
///     .signature_request()
///     .send_with_template(
///         CallArgs::new()
///             .field("template_id", "c26b8a16784a872da37ea946b9ddec7c1e11dff6")
///             .field("signers", json!({ "Client": { "name": "George", "email_address": "george@example.com" } })),
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Creates a new builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// API base URL used by this client.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Credentials used by this client.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Calls `operation` with `args`.
    ///
    /// This is the single dispatch path behind every resource method. Argument
    /// problems (missing required fields, missing path parameters) are not
    /// returned here: they come out of the returned [`Dispatch`] without any
    /// request being sent.
    pub fn execute(&self, operation: Operation, args: CallArgs) -> Dispatch {
        match RequestPlan::build(operation.descriptor(), args) {
            Ok(plan) => Dispatch::new(operation, call::exchange(Arc::clone(&self.inner), plan)),
            Err(error) => Dispatch::failed(operation, error),
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credentials", &self.inner.credentials)
            .field("timeout", &self.inner.timeout)
            .field("cancel_policy", &self.inner.cancel_policy)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiClient({}, {})", self.inner.base_url, self.inner.credentials)
    }
}
