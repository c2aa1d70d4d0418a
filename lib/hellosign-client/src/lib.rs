//! # HelloSign client
//!
//! Client for the HelloSign v3 REST API: signature requests, templates and
//! embedded signing.
//!
//! Every operation is described by a static [`ResourceDescriptor`] and goes
//! through one generic dispatch path that:
//!
//! - checks required fields and path parameters before any I/O
//! - encodes the body as JSON, or as `multipart/form-data` when files are attached
//! - adds the `Authorization` header (API key or OAuth bearer token)
//! - normalizes the response into an [`ApiResponse`] or an [`ApiClientError`]
//!
//! ## Two ways to get the outcome
//!
//! Operations return a [`Dispatch`]. Await it for a deferred value, or hand it
//! a callback with [`Dispatch::on_complete`]:
//!
//! ```rust,no_run
//! use hellosign_client::{ApiClient, CallArgs};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder().with_api_key("my-api-key").build()?;
//!
//! let args = CallArgs::new()
//!     .field("test_mode", 1)
//!     .field("title", "NDA with Acme Co.")
//!     .field("signers", json!([{ "email_address": "jack@example.com", "name": "Jack" }]))
//!     .file("docs/nda.pdf");
//!
//! // Deferred value
//! let response = client.signature_request().send(args.clone()).await?;
//! println!("{:?}", response.as_json());
//!
//! // Callback, invoked once from a spawned task
//! client.signature_request().send(args).on_complete(|result| {
//!     if let Err(error) = result {
//!         eprintln!("send failed: {error}");
//!     }
//! });
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Use [`ApiClient::builder`], or [`ClientConfig`] to load credentials from the
//! environment (`HELLOSIGN_API_KEY`, `HELLOSIGN_CLIENT_ID`,
//! `HELLOSIGN_CLIENT_SECRET`, `HELLOSIGN_DEV`) or, with the `yaml` feature,
//! from a YAML document.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;

pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, ApiResponse, ApiResult, AuthenticationError,
    BodyEncoding, CallArgs, CancelPolicy, ClientConfig, Credentials, DEV_BASE_URL, DEV_TOKEN_URL,
    Dispatch, DownloadStream, ENV_API_KEY, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_DEV, EmbeddedApi,
    ErrorKind, FileRef, Hook, Operation, PRODUCTION_BASE_URL, PRODUCTION_TOKEN_URL,
    ResourceDescriptor, ResponseKind, SecureString, SignatureRequestApi, TemplateApi,
};

pub use self::client::oauth2;
