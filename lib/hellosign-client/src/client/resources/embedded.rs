use serde_json::Value;

use crate::client::{ApiClient, CallArgs, Dispatch, Operation};

/// Embedded signing and editing URLs, see [`ApiClient::embedded`].
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl EmbeddedApi<'_> {
    /// `embedded.sign_url`: URL to open the signer's iFrame.
    pub fn sign_url(&self, signature_id: impl Into<String>) -> Dispatch {
        let args = CallArgs::new().field("signature_id", Value::String(signature_id.into()));
        self.client.execute(Operation::EmbeddedSignUrl, args)
    }

    /// `embedded.edit_url`: URL to open the template editor iFrame.
    pub fn edit_url(&self, template_id: impl Into<String>) -> Dispatch {
        let args = CallArgs::new().field("template_id", Value::String(template_id.into()));
        self.client.execute(Operation::EmbeddedEditUrl, args)
    }
}
