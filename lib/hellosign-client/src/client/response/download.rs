use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client::ApiClientError;

/// Byte stream over a downloaded file.
///
/// The body is not buffered: chunks are pulled from the connection as the
/// stream is polled.
///
/// # Example
///
/// ```rust,no_run
/// # use hellosign_client::{ApiClient, ApiClientError};
/// # async fn example(client: ApiClient) -> Result<(), ApiClientError> {
/// let response = client
///     .signature_request()
///     .download("fa5c8a0b0f492d768749333ad6fcc214c111e967", Some("pdf"))
///     .await?;
///
/// let mut file = tokio::fs::File::create("signed.pdf")
///     .await
///     .expect("writable file");
/// response.into_stream()?.write_to(&mut file).await?;
/// # Ok(())
/// # }
/// ```
pub struct DownloadStream {
    content_type: Option<String>,
    content_length: Option<u64>,
    inner: BoxStream<'static, Result<Bytes, ApiClientError>>,
}

impl DownloadStream {
    pub(in crate::client) fn from_response(response: reqwest::Response) -> Self {
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();
        let inner = response.bytes_stream().map_err(ApiClientError::from).boxed();

        Self {
            content_type,
            content_length,
            inner,
        }
    }

    pub(in crate::client) fn from_bytes(content_type: Option<String>, data: Bytes) -> Self {
        let content_length = Some(data.len() as u64);
        Self {
            content_type,
            content_length,
            inner: stream::once(async move { Ok(data) }).boxed(),
        }
    }

    /// `Content-Type` announced by the service, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// `Content-Length` announced by the service, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Copies the whole stream into `writer` and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails mid-stream or the writer fails.
    pub async fn write_to<W>(mut self, writer: &mut W) -> Result<u64, ApiClientError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0_u64;
        while let Some(chunk) = self.inner.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }
        writer.flush().await.map_err(write_error)?;
        Ok(written)
    }

    /// Collects the whole stream in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails mid-stream.
    pub async fn bytes(self) -> Result<Bytes, ApiClientError> {
        let buffer = self
            .inner
            .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(&chunk);
                Ok(buffer)
            })
            .await?;
        Ok(buffer.freeze())
    }
}

fn write_error(error: std::io::Error) -> ApiClientError {
    ApiClientError::Transport {
        status: None,
        message: format!("failed to write download: {error}"),
    }
}

impl Stream for DownloadStream {
    type Item = Result<Bytes, ApiClientError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for DownloadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadStream")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_write_buffered_download() {
        let download =
            DownloadStream::from_bytes(Some("application/pdf".to_string()), Bytes::from("%PDF-1.4"));
        assert_eq!(download.content_type(), Some("application/pdf"));
        assert_eq!(download.content_length(), Some(8));

        let mut out = Vec::new();
        let written = download.write_to(&mut out).await.expect("write");

        assert_eq!(written, 8);
        assert_eq!(out, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn should_collect_chunks() {
        let download = DownloadStream {
            content_type: None,
            content_length: None,
            inner: stream::iter(vec![Ok(Bytes::from("ab")), Ok(Bytes::from("cd"))]).boxed(),
        };

        let data = download.bytes().await.expect("bytes");

        assert_eq!(data, Bytes::from("abcd"));
    }

    #[tokio::test]
    async fn should_surface_mid_stream_failure() {
        let download = DownloadStream {
            content_type: None,
            content_length: None,
            inner: stream::iter(vec![
                Ok(Bytes::from("ab")),
                Err(ApiClientError::Network {
                    message: "connection reset".to_string(),
                }),
            ])
            .boxed(),
        };

        let error = download.bytes().await.expect_err("should fail");

        insta::assert_snapshot!(error, @"Network error: connection reset");
    }
}
