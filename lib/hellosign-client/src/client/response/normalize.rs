use http::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{ApiResponse, DownloadStream};
use crate::client::{ApiClientError, ResponseKind};

const BODY_MAX_LENGTH: usize = 1024;

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|mime| {
            mime.subtype() == mime::JSON || mime.suffix().is_some_and(|it| it == mime::JSON)
        })
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

fn truncate(mut text: String) -> String {
    if text.len() > BODY_MAX_LENGTH {
        let mut end = BODY_MAX_LENGTH;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("... (truncated)");
    }
    text
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Builds the error for a non-2xx JSON body.
///
/// The message is looked up in `error.message`, `error.error_msg` then `message`.
pub(super) fn api_error(status: StatusCode, body: &Value) -> ApiClientError {
    let message = text_at(body, "/error/message")
        .or_else(|| text_at(body, "/error/error_msg"))
        .or_else(|| text_at(body, "/message"))
        .map_or_else(|| status_text(status), str::to_string);
    let error_name = text_at(body, "/error/error_name").map(str::to_string);

    ApiClientError::Api {
        status: status.as_u16(),
        message,
        error_name,
    }
}

fn unexpected_body(status: StatusCode, content_type: Option<&str>, body: &[u8]) -> ApiClientError {
    let text = String::from_utf8_lossy(body).into_owned();
    let message = match content_type {
        Some(content_type) => format!("expected JSON, got {content_type}: {}", truncate(text)),
        None => format!("expected JSON: {}", truncate(text)),
    };
    ApiClientError::Transport {
        status: Some(status.as_u16()),
        message,
    }
}

async fn read_body(
    response: reqwest::Response,
    status: StatusCode,
) -> Result<bytes::Bytes, ApiClientError> {
    response
        .bytes()
        .await
        .map_err(|err| ApiClientError::Transport {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {err}"),
        })
}

/// Classifies a transport response into a success value or a uniform error.
///
/// Error bodies are parsed as JSON whatever their content type. Successful
/// bodies of JSON operations must be JSON; only download operations stream
/// the body.
pub(crate) async fn normalize(
    response: reqwest::Response,
    expected: ResponseKind,
) -> Result<ApiResponse, ApiClientError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    debug!(%status, ?content_type, ?expected, "normalizing response");

    if !status.is_success() {
        let body = read_body(response, status).await?;
        if let Ok(value @ Value::Object(_)) = serde_json::from_slice::<Value>(&body) {
            return Err(api_error(status, &value));
        }

        let text = String::from_utf8_lossy(&body).into_owned();
        let message = if text.trim().is_empty() {
            status_text(status)
        } else {
            truncate(text)
        };
        return Err(ApiClientError::Transport {
            status: Some(status.as_u16()),
            message,
        });
    }

    if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
        return Ok(ApiResponse::Empty);
    }

    match expected {
        ResponseKind::Json => {
            let body = read_body(response, status).await?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(ApiResponse::Empty);
            }
            serde_json::from_slice(&body)
                .map(ApiResponse::Json)
                .map_err(|_| unexpected_body(status, content_type.as_deref(), &body))
        }
        ResponseKind::Download if is_json(content_type.as_deref()) => {
            let body = read_body(response, status).await?;
            serde_json::from_slice(&body)
                .map(ApiResponse::Json)
                .map_err(|err| ApiClientError::Transport {
                    status: Some(status.as_u16()),
                    message: format!("invalid JSON body: {err}"),
                })
        }
        ResponseKind::Download if content_type.is_none() => {
            let body = read_body(response, status).await?;
            if body.is_empty() {
                return Ok(ApiResponse::Empty);
            }
            Ok(ApiResponse::Download(DownloadStream::from_bytes(None, body)))
        }
        ResponseKind::Download => Ok(ApiResponse::Download(DownloadStream::from_response(
            response,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_recognize_json_content_types() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(is_json(Some("application/problem+json")));
        assert!(!is_json(Some("application/pdf")));
        assert!(!is_json(Some("not a mime")));
        assert!(!is_json(None));
    }

    #[test]
    fn should_read_hellosign_error_shape() {
        let body = json!({
            "error": { "error_msg": "Invalid API key", "error_name": "unauthorized" }
        });

        let error = api_error(StatusCode::UNAUTHORIZED, &body);

        insta::assert_debug_snapshot!(error, @r#"
        Api {
            status: 401,
            message: "Invalid API key",
            error_name: Some(
                "unauthorized",
            ),
        }
        "#);
    }

    #[test]
    fn should_prefer_error_message_then_top_level_message() {
        let body = json!({ "error": { "message": "first", "error_msg": "second" } });
        let error = api_error(StatusCode::BAD_REQUEST, &body);
        assert_eq!(error.to_string(), "API error (400): first");

        let body = json!({ "message": "Not found" });
        let error = api_error(StatusCode::NOT_FOUND, &body);
        assert_eq!(error.to_string(), "API error (404): Not found");
    }

    #[test]
    fn should_fall_back_to_status_text() {
        let error = api_error(StatusCode::FORBIDDEN, &json!({ "error": {} }));
        assert_eq!(error.to_string(), "API error (403): Forbidden");
    }

    fn response(status: u16, content_type: &str, body: &'static str) -> reqwest::Response {
        let response = http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, content_type)
            .body(body)
            .expect("valid response");
        reqwest::Response::from(response)
    }

    #[tokio::test]
    async fn should_parse_json_error_body_sent_as_text() {
        let response = response(
            401,
            "text/plain",
            r#"{"error":{"message":"Invalid API key"}}"#,
        );

        let error = normalize(response, ResponseKind::Json)
            .await
            .expect_err("unauthorized");

        insta::assert_snapshot!(error, @"API error (401): Invalid API key");
    }

    #[tokio::test]
    async fn should_reject_html_body_for_json_operation() {
        let response = response(200, "text/html", "<html>maintenance</html>");

        let error = normalize(response, ResponseKind::Json)
            .await
            .expect_err("not json");

        insta::assert_snapshot!(error, @"Transport error (200): expected JSON, got text/html: <html>maintenance</html>");
    }

    #[tokio::test]
    async fn should_stream_non_json_body_for_download_operation() {
        let response = response(200, "application/zip", "PK");

        let outcome = normalize(response, ResponseKind::Download)
            .await
            .expect("download");

        assert!(matches!(outcome, ApiResponse::Download(_)));
    }

    #[test]
    fn should_truncate_long_bodies() {
        let text = truncate("é".repeat(600));
        assert!(text.ends_with("... (truncated)"));
        assert!(text.len() <= BODY_MAX_LENGTH + "... (truncated)".len());
    }
}
