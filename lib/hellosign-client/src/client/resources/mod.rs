mod embedded;
mod signature_request;
mod template;

pub use self::embedded::EmbeddedApi;
pub use self::signature_request::SignatureRequestApi;
pub use self::template::TemplateApi;

use super::ApiClient;

impl ApiClient {
    /// Signature request operations.
    pub fn signature_request(&self) -> SignatureRequestApi<'_> {
        SignatureRequestApi { client: self }
    }

    /// Template operations.
    pub fn template(&self) -> TemplateApi<'_> {
        TemplateApi { client: self }
    }

    /// Embedded signing operations.
    pub fn embedded(&self) -> EmbeddedApi<'_> {
        EmbeddedApi { client: self }
    }
}
