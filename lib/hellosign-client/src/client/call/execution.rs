use std::sync::Arc;

use http::header::AUTHORIZATION;
use tracing::{debug, warn};

use super::{ApiResult, CancelPolicy};
use crate::client::descriptor::Hook;
use crate::client::request::RequestPlan;
use crate::client::response::{ApiResponse, normalize};
use crate::client::{ApiClientError, ClientInner, Credentials, SecureString};

/// Sends a validated request and normalizes the outcome.
pub(in crate::client) async fn exchange(inner: Arc<ClientInner>, plan: RequestPlan) -> ApiResult {
    let descriptor = plan.descriptor;
    let outcome = send(&inner, plan).await;
    apply_hook(descriptor.name, descriptor.hook, inner.cancel_policy, outcome)
}

async fn send(inner: &ClientInner, plan: RequestPlan) -> ApiResult {
    let operation = plan.descriptor.name;
    let expected = plan.descriptor.response;
    let request = plan
        .into_request(
            &inner.http,
            &inner.base_url,
            &inner.credentials,
            &inner.user_agent,
            inner.timeout,
        )
        .await?;
    let sent_token = match &inner.credentials {
        Credentials::OAuth2(_) => bearer_token(&request),
        Credentials::ApiKey(_) => None,
    };

    debug!(operation, method = %request.method(), url = %request.url(), "sending...");
    let response = inner.http.execute(request).await.map_err(|err| {
        debug!(operation, error = %err, "transport failure");
        ApiClientError::from(err)
    })?;
    debug!(operation, status = %response.status(), "...receiving");

    let outcome = normalize(response, expected).await;
    let unauthorized = matches!(&outcome, Err(ApiClientError::Api { status: 401, .. }));
    if let (true, Credentials::OAuth2(config), Some(token)) =
        (unauthorized, &inner.credentials, sent_token)
        && config.token_cache.clear_if(token.as_str()).await
    {
        debug!(operation, "bearer token rejected, token cache cleared");
    }
    outcome
}

fn bearer_token(request: &reqwest::Request) -> Option<SecureString> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| SecureString::new(token.to_string()))
}

pub(super) fn apply_hook(
    operation: &'static str,
    hook: Hook,
    policy: CancelPolicy,
    outcome: ApiResult,
) -> ApiResult {
    match (hook, policy, outcome) {
        (Hook::CancelPolicy, CancelPolicy::Swallow, Err(error)) if !error.is_usage_error() => {
            warn!(operation, %error, "cancel failure ignored");
            Ok(ApiResponse::Empty)
        }
        (_, _, outcome) => outcome,
    }
}
