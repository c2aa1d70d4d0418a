use std::fmt::Debug;

use super::auth::AuthenticationError;
use super::oauth2::OAuth2Error;

/// Discriminant of an [`ApiClientError`].
///
/// Usage errors (`AuthConfig`, `MissingRequiredField`, `MissingPathParam`,
/// `FileNotReadable`, `InvalidArguments`) are raised before any network I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorKind {
    /// The client was constructed without usable credentials.
    AuthConfig,
    /// One or more required fields are absent or empty.
    MissingRequiredField,
    /// A path template placeholder has no value.
    MissingPathParam,
    /// A file reference does not point to a readable file.
    FileNotReadable,
    /// Call arguments have an unsupported shape.
    InvalidArguments,
    /// Credentials could not be turned into an authorization header.
    Authentication,
    /// The remote service rejected the request.
    Api,
    /// The transport failed before any response was received.
    Network,
    /// The response was malformed or had an unexpected shape.
    Transport,
    /// A successful body could not be decoded into the requested type.
    Decode,
}

/// Errors that can occur when using the `ApiClient`.
///
/// Every variant maps to an [`ErrorKind`]; use [`ApiClientError::kind`] to
/// branch on the category and [`ApiClientError::http_status`] to read the
/// status code when one was received.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// Neither an API key nor complete OAuth client credentials were provided.
    #[display("Invalid authentication configuration: {message}")]
    #[from(skip)]
    AuthConfig {
        /// Description of the configuration issue.
        message: String,
    },

    /// Required fields are missing from the call arguments.
    #[display("Operation '{operation}' is missing required fields: {}", fields.join(", "))]
    #[from(skip)]
    MissingRequiredField {
        /// Name of the operation being called.
        operation: &'static str,
        /// Every missing field name, in declaration order.
        fields: Vec<String>,
    },

    /// Path template contains unresolved parameters.
    #[display("Path '{path}' is missing required arguments: {}", missings.join(", "))]
    #[from(skip)]
    MissingPathParam {
        /// The path template that couldn't be resolved.
        path: String,
        /// List of missing parameter names.
        missings: Vec<String>,
    },

    /// A file to upload cannot be read.
    #[display("File '{path}' is not readable: {reason}")]
    #[from(skip)]
    FileNotReadable {
        /// The offending path.
        path: String,
        /// Underlying I/O message.
        reason: String,
    },

    /// Call arguments have an unsupported shape.
    #[display("Invalid call arguments: {message}")]
    #[from(skip)]
    InvalidArguments {
        /// Description of the problem.
        message: String,
    },

    /// Authentication header could not be produced.
    Authentication(AuthenticationError),

    /// OAuth2 token acquisition failed.
    OAuth2(OAuth2Error),

    /// The service answered with a non-2xx status and a JSON error body.
    #[display("API error ({status}): {message}")]
    #[from(skip)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service-provided message.
        message: String,
        /// Service-provided error name, when present.
        error_name: Option<String>,
    },

    /// Connection-level failure before any response.
    #[display("Network error: {message}")]
    #[from(skip)]
    Network {
        /// Underlying transport message.
        message: String,
    },

    /// Unexpected or malformed response.
    #[display("Transport error{}: {message}", status.map(|it| format!(" ({it})")).unwrap_or_default())]
    #[from(skip)]
    Transport {
        /// HTTP status code, if a response was received.
        status: Option<u16>,
        /// Raw body, status text or parsing error.
        message: String,
    },

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// JSON serialization error while encoding a request body.
    JsonValueError(serde_json::Error),

    /// Query parameter serialization error.
    QuerySerializationError(serde_urlencoded::ser::Error),

    /// JSON response deserialization failure.
    #[display("Failed to deserialize JSON at '{path}': {error}")]
    #[from(skip)]
    JsonError {
        /// Path inside the document where decoding failed.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
    },

    /// The response variant cannot be converted as requested.
    #[display("Unsupported response for {name}: got {actual}")]
    #[from(skip)]
    UnsupportedResponse {
        /// Conversion that was attempted.
        name: &'static str,
        /// What the response actually was.
        actual: &'static str,
    },
}

impl ApiClientError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthConfig { .. } => ErrorKind::AuthConfig,
            Self::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            Self::MissingPathParam { .. } => ErrorKind::MissingPathParam,
            Self::FileNotReadable { .. } => ErrorKind::FileNotReadable,
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Self::Authentication(_) | Self::OAuth2(_) | Self::InvalidHeaderValue(_) => {
                ErrorKind::Authentication
            }
            Self::Api { .. } => ErrorKind::Api,
            Self::Network { .. } => ErrorKind::Network,
            Self::Transport { .. }
            | Self::UrlError(_)
            | Self::JsonValueError(_)
            | Self::QuerySerializationError(_) => ErrorKind::Transport,
            Self::JsonError { .. } | Self::UnsupportedResponse { .. } => ErrorKind::Decode,
        }
    }

    /// Returns the HTTP status code when the error came from a response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` for errors raised before any request was sent.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AuthConfig
                | ErrorKind::MissingRequiredField
                | ErrorKind::MissingPathParam
                | ErrorKind::FileNotReadable
                | ErrorKind::InvalidArguments
        )
    }
}

impl From<reqwest::Error> for ApiClientError {
    fn from(error: reqwest::Error) -> Self {
        let status = error.status().map(|it| it.as_u16());
        if error.is_connect() || error.is_timeout() || error.is_request() {
            Self::Network {
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                status,
                message: error.to_string(),
            }
        }
    }
}
