#![allow(dead_code)]

use std::path::PathBuf;

use hellosign_client::{ApiClient, ApiClientBuilder};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const API_KEY: &str = "c4fe2f4b0a4ab7bfb8e0c2a6a1bb2c5d";
/// `base64("c4fe2f4b0a4ab7bfb8e0c2a6a1bb2c5d:")`
pub const BASIC_AUTH: &str = "Basic YzRmZTJmNGIwYTRhYjdiZmI4ZTBjMmE2YTFiYjJjNWQ6";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn builder(server: &MockServer) -> ApiClientBuilder {
    ApiClient::builder().with_base_url(format!("{}/v3", server.uri()))
}

pub fn api_key_client(server: &MockServer) -> ApiClient {
    builder(server)
        .with_api_key(API_KEY)
        .build()
        .expect("valid client")
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn signers() -> Value {
    json!([
        { "email_address": "jack@example.com", "name": "Jack", "order": 0 },
        { "email_address": "jill@example.com", "name": "Jill", "order": 1 },
    ])
}

pub fn signature_request(id: &str) -> Value {
    json!({
        "signature_request": {
            "signature_request_id": id,
            "title": "NDA with Acme Co.",
            "is_complete": false,
            "signatures": [
                { "signature_id": "78caf2a1d01cd39cea2bc1cbb340dac3", "signer_email_address": "jack@example.com", "status_code": "awaiting_signature" },
                { "signature_id": "616629ed37f8588d28600be17ab5d6b7", "signer_email_address": "jill@example.com", "status_code": "awaiting_signature" },
            ],
        }
    })
}
