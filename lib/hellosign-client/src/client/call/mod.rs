use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::runtime::{Builder, Handle};
use tracing::{debug, error};

use super::descriptor::Operation;
use super::response::ApiResponse;
use super::ApiClientError;

mod execution;
pub(super) use self::execution::exchange;

#[cfg(test)]
mod tests;

/// Outcome delivered to the caller, whichever channel is used.
pub type ApiResult = Result<ApiResponse, ApiClientError>;

type CompletionFuture = Pin<Box<dyn Future<Output = ApiResult> + Send>>;

/// What to do when `signature_request.cancel` fails.
///
/// The service answers some cancellations (already signed, already canceled)
/// with an error; callers that only need the request to be gone can swallow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Deliver the failure to the caller.
    #[default]
    Surface,
    /// Log the failure with `warn!` and deliver [`ApiResponse::Empty`].
    Swallow,
}

/// One in-flight operation call.
///
/// A `Dispatch` wraps exactly one completion future and is consumed by one of
/// two delivery channels:
///
/// - `.await` resolves to the [`ApiResult`] (deferred value)
/// - [`Dispatch::on_complete`] hands the [`ApiResult`] to a callback
///
/// Nothing is sent until one of them is used. Errors found while validating the
/// arguments are delivered through the chosen channel like any other failure.
///
/// # Example
///
/// ```rust,no_run
/// # use hellosign_client::{ApiClient, ApiClientError};
/// # async fn example(client: ApiClient) -> Result<(), ApiClientError> {
/// // Deferred value
/// let templates = client.template().list().await?;
///
/// // Callback
/// client.template().list().on_complete(|result| match result {
///     Ok(response) => println!("{response:?}"),
///     Err(error) => eprintln!("{error}"),
/// });
/// # Ok(())
/// # }
/// ```
#[must_use = "a dispatch does nothing unless awaited or given a callback"]
pub struct Dispatch {
    operation: Operation,
    future: CompletionFuture,
}

impl Dispatch {
    pub(super) fn new<F>(operation: Operation, future: F) -> Self
    where
        F: Future<Output = ApiResult> + Send + 'static,
    {
        Self {
            operation,
            future: Box::pin(future),
        }
    }

    pub(super) fn failed(operation: Operation, error: ApiClientError) -> Self {
        debug!(%operation, %error, "call rejected before dispatch");
        Self::new(operation, std::future::ready(Err(error)))
    }

    /// The operation this call targets.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Runs the call in the background and hands its outcome to `callback`.
    ///
    /// Returns immediately. The callback is invoked exactly once, from a
    /// spawned task and never from within this method. Inside a Tokio runtime
    /// the task is spawned on it; otherwise a dedicated thread drives the call
    /// on its own current-thread runtime.
    pub fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(ApiResult) + Send + 'static,
    {
        let Self { operation, future } = self;

        if let Ok(handle) = Handle::try_current() {
            handle.spawn(async move {
                let result = future.await;
                callback(result);
            });
            return;
        }

        let spawned = std::thread::Builder::new()
            .name(format!("hellosign-{operation}"))
            .spawn(move || match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => {
                    let result = runtime.block_on(future);
                    callback(result);
                }
                Err(err) => callback(Err(ApiClientError::Network {
                    message: format!("cannot start a runtime for {operation}: {err}"),
                })),
            });
        if let Err(err) = spawned {
            error!(%operation, %err, "cannot spawn the dispatch thread, outcome is lost");
        }
    }
}

impl IntoFuture for Dispatch {
    type Output = ApiResult;
    type IntoFuture = CompletionFuture;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}
