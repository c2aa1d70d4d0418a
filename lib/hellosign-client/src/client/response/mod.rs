use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiClientError;

mod download;
pub use self::download::DownloadStream;

mod normalize;
pub(super) use self::normalize::normalize;

/// Successful outcome of an operation.
#[derive(Debug)]
pub enum ApiResponse {
    /// Parsed JSON document.
    Json(Value),
    /// Streamed file content.
    Download(DownloadStream),
    /// No content.
    Empty,
}

impl ApiResponse {
    fn variant_name(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Download(_) => "download",
            Self::Empty => "empty",
        }
    }

    /// Returns the JSON document, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Download(_) | Self::Empty => None,
        }
    }

    /// Returns `true` for [`ApiResponse::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Consumes the response as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnsupportedResponse`] for downloads and empty responses.
    pub fn into_json(self) -> Result<Value, ApiClientError> {
        match self {
            Self::Json(value) => Ok(value),
            other => Err(ApiClientError::UnsupportedResponse {
                name: "json",
                actual: other.variant_name(),
            }),
        }
    }

    /// Deserializes the JSON document into `T`.
    ///
    /// Failures report the path inside the document where decoding stopped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hellosign_client::ApiResponse;
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Deserialize)]
    /// struct Envelope {
    ///     signature_request: SignatureRequest,
    /// }
    ///
    /// #[derive(Deserialize)]
    /// struct SignatureRequest {
    ///     signature_request_id: String,
    /// }
    ///
    /// let response = ApiResponse::Json(json!({
    ///     "signature_request": { "signature_request_id": "fa5c8a0b" }
    /// }));
    /// let envelope: Envelope = response.deserialize()?;
    /// assert_eq!(envelope.signature_request.signature_request_id, "fa5c8a0b");
    /// # Ok::<(), hellosign_client::ApiClientError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::JsonError`] when the document does not match `T`,
    /// or [`ApiClientError::UnsupportedResponse`] when there is no document.
    pub fn deserialize<T>(self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let value = self.into_json()?;
        serde_path_to_error::deserialize(value).map_err(|err| ApiClientError::JsonError {
            path: err.path().to_string(),
            error: err.into_inner(),
        })
    }

    /// Consumes the response as a download stream.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnsupportedResponse`] for JSON and empty responses.
    pub fn into_stream(self) -> Result<DownloadStream, ApiClientError> {
        match self {
            Self::Download(stream) => Ok(stream),
            other => Err(ApiClientError::UnsupportedResponse {
                name: "download",
                actual: other.variant_name(),
            }),
        }
    }
}
