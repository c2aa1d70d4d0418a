use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use tokio::sync::oneshot;

use super::execution::apply_hook;
use super::*;
use crate::client::descriptor::Hook;
use crate::ErrorKind;

fn api_error() -> ApiClientError {
    ApiClientError::Api {
        status: 400,
        message: "This request has already been canceled".to_string(),
        error_name: Some("bad_request".to_string()),
    }
}

#[tokio::test]
async fn should_resolve_future_once() {
    let dispatch = Dispatch::new(Operation::TemplateList, async {
        Ok(ApiResponse::Json(json!({ "templates": [] })))
    });
    assert_eq!(dispatch.operation(), Operation::TemplateList);

    let response = dispatch.await.expect("success");

    assert_eq!(response.as_json(), Some(&json!({ "templates": [] })));
}

#[tokio::test]
async fn should_deliver_usage_error_through_future() {
    let dispatch = Dispatch::failed(
        Operation::SignatureRequestSend,
        ApiClientError::MissingRequiredField {
            operation: "signature_request.send",
            fields: vec!["signers".to_string()],
        },
    );

    let error = dispatch.await.expect_err("usage error");

    assert_eq!(error.kind(), ErrorKind::MissingRequiredField);
}

#[tokio::test]
async fn should_call_back_once_outside_calling_frame() {
    let called = Arc::new(AtomicBool::new(false));
    let count = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel();

    let dispatch = Dispatch::new(Operation::TemplateList, async { Ok(ApiResponse::Empty) });
    dispatch.on_complete({
        let called = Arc::clone(&called);
        let count = Arc::clone(&count);
        move |result| {
            called.store(true, Ordering::SeqCst);
            count.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(result.map(|response| response.is_empty()));
        }
    });
    assert!(!called.load(Ordering::SeqCst), "callback ran synchronously");

    let result = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("callback in time")
        .expect("callback called");

    assert!(result.expect("success"));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn should_deliver_usage_error_through_callback() {
    let (tx, rx) = oneshot::channel();

    Dispatch::failed(
        Operation::TemplateGet,
        ApiClientError::MissingPathParam {
            path: "/template/{template_id}".to_string(),
            missings: vec!["template_id".to_string()],
        },
    )
    .on_complete(move |result| {
        let _ = tx.send(result.map_err(|error| error.kind()));
    });

    let result = rx.await.expect("callback called");

    assert_eq!(result.expect_err("usage error"), ErrorKind::MissingPathParam);
}

#[test]
fn should_call_back_without_runtime() {
    let (tx, rx) = std::sync::mpsc::channel();

    let dispatch = Dispatch::new(Operation::TemplateList, async {
        tokio::task::yield_now().await;
        Ok(ApiResponse::Json(json!({ "ok": true })))
    });
    dispatch.on_complete(move |result| {
        let _ = tx.send(result.map(|response| response.as_json().cloned()));
    });

    let result = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("callback called");

    assert_eq!(result.expect("success"), Some(json!({ "ok": true })));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn should_swallow_cancel_failure_when_asked() {
    let result = apply_hook(
        "signature_request.cancel",
        Hook::CancelPolicy,
        CancelPolicy::Swallow,
        Err(api_error()),
    );

    assert!(result.expect("swallowed").is_empty());
}

#[test]
fn should_surface_cancel_failure_by_default() {
    let result = apply_hook(
        "signature_request.cancel",
        Hook::CancelPolicy,
        CancelPolicy::default(),
        Err(api_error()),
    );

    assert_eq!(result.expect_err("surfaced").http_status(), Some(400));
}

#[test]
fn should_not_swallow_other_operations() {
    let result = apply_hook(
        "template.delete",
        Hook::None,
        CancelPolicy::Swallow,
        Err(api_error()),
    );

    assert!(result.is_err());
}

#[test]
fn should_not_swallow_usage_errors() {
    let result = apply_hook(
        "signature_request.cancel",
        Hook::CancelPolicy,
        CancelPolicy::Swallow,
        Err(ApiClientError::FileNotReadable {
            path: "a.pdf".to_string(),
            reason: "missing".to_string(),
        }),
    );

    assert!(result.is_err());
}
