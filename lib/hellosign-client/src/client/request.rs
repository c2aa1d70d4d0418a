use std::time::Duration;

use headers::{ContentType, HeaderMapExt};
use http::header::{AUTHORIZATION, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use tracing::warn;
use url::Url;

use super::args::CallArgs;
use super::body::{CallBody, MultipartBody, flatten_all};
use super::descriptor::{BodyEncoding, ResourceDescriptor};
use super::path::PathResolved;
use super::{ApiClientError, Credentials};

/// A validated request, ready to be turned into a transport request.
///
/// Building a plan does no I/O; files are read and credentials resolved later
/// by [`RequestPlan::into_request`].
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RequestPlan {
    pub(super) descriptor: &'static ResourceDescriptor,
    pub(super) path: String,
    pub(super) query: Vec<(String, String)>,
    pub(super) body: CallBody,
}

impl RequestPlan {
    /// Validates `args` against `descriptor` and chooses the encoding.
    ///
    /// Required fields are checked first and every missing one is reported,
    /// then path placeholders are substituted.
    pub(super) fn build(
        descriptor: &'static ResourceDescriptor,
        mut args: CallArgs,
    ) -> Result<Self, ApiClientError> {
        let missing: Vec<String> = descriptor
            .required_fields
            .iter()
            .filter(|name| !args.is_provided(name))
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ApiClientError::MissingRequiredField {
                operation: descriptor.name,
                fields: missing,
            });
        }

        let PathResolved { path } = PathResolved::resolve(descriptor.path_template, &mut args)?;
        let CallArgs { fields, files } = args;

        if descriptor.uses_query() {
            if !files.is_empty() {
                warn!(
                    operation = descriptor.name,
                    count = files.len(),
                    "files ignored for a query-string operation"
                );
            }
            return Ok(Self {
                descriptor,
                path,
                query: flatten_all(&fields),
                body: CallBody::Empty,
            });
        }

        let body = if !files.is_empty() || descriptor.encoding == BodyEncoding::Multipart {
            CallBody::Multipart(MultipartBody::new(&fields, files))
        } else if fields.is_empty() {
            CallBody::Empty
        } else {
            CallBody::Json(Value::Object(fields.into_iter().collect()))
        };

        Ok(Self {
            descriptor,
            path,
            query: Vec::new(),
            body,
        })
    }

    pub(super) fn method(&self) -> &Method {
        &self.descriptor.method
    }

    pub(super) fn build_url(&self, base_url: &Url) -> Result<Url, ApiClientError> {
        let url = format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        let mut url = url.parse::<Url>()?;

        if !self.query.is_empty() {
            let query_string = serde_urlencoded::to_string(&self.query)?;
            url.set_query(Some(&query_string));
        }

        Ok(url)
    }

    /// Reads attached files, resolves the authorization header and assembles the request.
    ///
    /// Files are read before credentials so an unreadable file never costs a token request.
    pub(super) async fn into_request(
        self,
        http: &reqwest::Client,
        base_url: &Url,
        credentials: &Credentials,
        user_agent: &HeaderValue,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Request, ApiClientError> {
        let url = self.build_url(base_url)?;
        let method = self.method().clone();

        let form = match &self.body {
            CallBody::Multipart(body) => Some(body.clone().into_form().await?),
            CallBody::Empty | CallBody::Json(_) => None,
        };

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credentials.header().await?);
        headers.insert(USER_AGENT, user_agent.clone());

        let mut builder = http.request(method, url);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = match (self.body, form) {
            (_, Some(form)) => builder.multipart(form),
            (CallBody::Json(value), None) => {
                headers.typed_insert(ContentType::json());
                builder.body(serde_json::to_vec(&value)?)
            }
            (CallBody::Empty | CallBody::Multipart(_), None) => builder,
        };

        let request = builder.headers(headers).build()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Operation;

    fn signers() -> Value {
        json!([{ "email_address": "jack@example.com", "name": "Jack" }])
    }

    #[test]
    fn should_report_all_missing_fields_before_path_params() {
        let args = CallArgs::new().field("signers", json!([]));

        let error = RequestPlan::build(
            Operation::SignatureRequestCreateEmbeddedWithTemplate.descriptor(),
            args,
        )
        .expect_err("fields are missing");

        insta::assert_snapshot!(error, @"Operation 'signature_request.create_embedded_with_template' is missing required fields: client_id, template_id, signers");
    }

    #[test]
    fn should_use_multipart_when_files_are_attached() {
        let args = CallArgs::new()
            .field("template_id", "c26b8a16784a872da37ea946b9ddec7c1e11dff6")
            .field("signers", signers())
            .file("nda.pdf");

        let plan = RequestPlan::build(
            Operation::SignatureRequestSendWithTemplate.descriptor(),
            args,
        )
        .expect("valid plan");

        let CallBody::Multipart(body) = &plan.body else {
            panic!("expected multipart, got {:?}", plan.body);
        };
        assert_eq!(body.files.len(), 1);
    }

    #[test]
    fn should_use_json_without_files() {
        let args = CallArgs::new()
            .field("template_id", "c26b8a16784a872da37ea946b9ddec7c1e11dff6")
            .field("signers", signers())
            .field("test_mode", true);

        let plan = RequestPlan::build(
            Operation::SignatureRequestSendWithTemplate.descriptor(),
            args,
        )
        .expect("valid plan");

        insta::assert_debug_snapshot!(plan.body, @r#"
        Json(
            Object {
                "template_id": String("c26b8a16784a872da37ea946b9ddec7c1e11dff6"),
                "signers": Array [
                    Object {
                        "email_address": String("jack@example.com"),
                        "name": String("Jack"),
                    },
                ],
                "test_mode": Bool(true),
            },
        )
        "#);
    }

    #[test]
    fn should_keep_multipart_default_without_files() {
        let args = CallArgs::new()
            .field("signers", signers())
            .field("file_url", json!(["https://example.com/nda.pdf"]));

        let plan = RequestPlan::build(Operation::SignatureRequestSend.descriptor(), args)
            .expect("valid plan");

        assert!(matches!(plan.body, CallBody::Multipart(_)));
    }

    #[test]
    fn should_build_embedded_request_as_multipart() {
        let args = CallArgs::new()
            .field("client_id", "b6b8e7deaf8f0b95c029dca049356d4a2cf9710a")
            .field("signers", signers())
            .file("nda.pdf");

        let plan = RequestPlan::build(
            Operation::SignatureRequestCreateEmbedded.descriptor(),
            args,
        )
        .expect("valid plan");

        assert_eq!(plan.path, "/signature_request/create_embedded");
        let CallBody::Multipart(body) = &plan.body else {
            panic!("expected multipart, got {:?}", plan.body);
        };
        insta::assert_debug_snapshot!(body.part_names(), @r#"
        [
            "client_id",
            "signers[0][email_address]",
            "signers[0][name]",
            "file[0]",
        ]
        "#);
    }

    #[test]
    fn should_move_path_params_out_of_the_body() {
        let args = CallArgs::new()
            .field("signature_request_id", "fa5c8a0b")
            .field("email_address", "jack@example.com");

        let plan = RequestPlan::build(Operation::SignatureRequestRemind.descriptor(), args)
            .expect("valid plan");

        assert_eq!(plan.path, "/signature_request/remind/fa5c8a0b");
        assert_eq!(
            plan.body,
            CallBody::Json(json!({ "email_address": "jack@example.com" }))
        );
    }

    #[test]
    fn should_send_get_arguments_in_query() {
        let args = CallArgs::new()
            .field("signature_request_id", "fa5c8a0b")
            .field("file_type", "zip");
        let plan = RequestPlan::build(Operation::SignatureRequestDownload.descriptor(), args)
            .expect("valid plan");

        let base = Url::parse("https://api.hellosign.com/v3").expect("valid url");
        let url = plan.build_url(&base).expect("valid url");

        insta::assert_snapshot!(url, @"https://api.hellosign.com/v3/signature_request/files/fa5c8a0b?file_type=zip");
        assert_eq!(plan.body, CallBody::Empty);
    }

    #[test]
    fn should_send_empty_body_without_fields() {
        let args = CallArgs::new().field("signature_request_id", "fa5c8a0b");
        let plan = RequestPlan::build(Operation::SignatureRequestCancel.descriptor(), args)
            .expect("valid plan");

        assert_eq!(plan.body, CallBody::Empty);
    }

    #[tokio::test]
    async fn should_build_authenticated_json_request() {
        let args = CallArgs::new()
            .field("signature_request_id", "fa5c8a0b")
            .field("email_address", "jack@example.com");
        let plan = RequestPlan::build(Operation::SignatureRequestRemind.descriptor(), args)
            .expect("valid plan");

        let request = plan
            .into_request(
                &reqwest::Client::new(),
                &Url::parse("https://api.hellosign.com/v3/").expect("valid url"),
                &Credentials::ApiKey("abc".into()),
                &HeaderValue::from_static("hellosign-client-test"),
                None,
            )
            .await
            .expect("valid request");

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://api.hellosign.com/v3/signature_request/remind/fa5c8a0b"
        );
        assert_eq!(request.headers()["authorization"], "Basic YWJjOg==");
        assert_eq!(request.headers()["content-type"], "application/json");
        assert_eq!(request.headers()["user-agent"], "hellosign-client-test");
        let body = request.body().and_then(reqwest::Body::as_bytes);
        assert_eq!(body, Some(br#"{"email_address":"jack@example.com"}"#.as_slice()));
    }
}
