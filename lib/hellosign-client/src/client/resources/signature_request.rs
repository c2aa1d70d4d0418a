use serde_json::Value;

use crate::client::{ApiClient, CallArgs, Dispatch, Operation};

/// Signature request operations, see [`ApiClient::signature_request`].
#[derive(Debug, Clone, Copy)]
pub struct SignatureRequestApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl SignatureRequestApi<'_> {
    fn with_id(signature_request_id: impl Into<String>) -> CallArgs {
        CallArgs::new().field(
            "signature_request_id",
            Value::String(signature_request_id.into()),
        )
    }

    /// `signature_request.get`: fetches one signature request.
    pub fn get(&self, signature_request_id: impl Into<String>) -> Dispatch {
        self.client.execute(
            Operation::SignatureRequestGet,
            Self::with_id(signature_request_id),
        )
    }

    /// `signature_request.list`: first page of the account's signature requests.
    pub fn list(&self) -> Dispatch {
        self.list_with(CallArgs::new())
    }

    /// `signature_request.list` with paging or search arguments
    /// (`page`, `page_size`, `query`, `account_id`).
    pub fn list_with(&self, args: CallArgs) -> Dispatch {
        self.client.execute(Operation::SignatureRequestList, args)
    }

    /// `signature_request.send`: sends documents for signature.
    ///
    /// `signers` is required; documents are attached with [`CallArgs::file`]
    /// or referenced through `file_url`.
    ///
    /// ```rust,no_run
    /// # use hellosign_client::{ApiClient, ApiClientError, CallArgs};
    /// # use serde_json::json;
    /// # async fn example(client: ApiClient) -> Result<(), ApiClientError> {
    /// let args = CallArgs::new()
    ///     .field("test_mode", 1)
    ///     .field("title", "NDA with Acme Co.")
    ///     .field("signers", json!([
    ///         { "email_address": "jack@example.com", "name": "Jack", "order": 0 },
    ///         { "email_address": "jill@example.com", "name": "Jill", "order": 1 },
    ///     ]))
    ///     .file("docs/nda.pdf");
    ///
    /// let response = client.signature_request().send(args).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn send(&self, args: CallArgs) -> Dispatch {
        self.client.execute(Operation::SignatureRequestSend, args)
    }

    /// `signature_request.send_with_template`: requires `template_id` and `signers`.
    pub fn send_with_template(&self, args: CallArgs) -> Dispatch {
        self.client
            .execute(Operation::SignatureRequestSendWithTemplate, args)
    }

    /// `signature_request.remind`: reminds a signer by email address.
    pub fn remind(
        &self,
        signature_request_id: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Dispatch {
        let args = Self::with_id(signature_request_id)
            .field("email_address", Value::String(email_address.into()));
        self.client.execute(Operation::SignatureRequestRemind, args)
    }

    /// `signature_request.update`: changes the email address of one signature.
    pub fn update(
        &self,
        signature_request_id: impl Into<String>,
        signature_id: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Dispatch {
        let args = Self::with_id(signature_request_id)
            .field("signature_id", Value::String(signature_id.into()))
            .field("email_address", Value::String(email_address.into()));
        self.client.execute(Operation::SignatureRequestUpdate, args)
    }

    /// `signature_request.cancel`: cancels an incomplete request.
    ///
    /// Failures follow the client [`CancelPolicy`](crate::CancelPolicy).
    pub fn cancel(&self, signature_request_id: impl Into<String>) -> Dispatch {
        self.client.execute(
            Operation::SignatureRequestCancel,
            Self::with_id(signature_request_id),
        )
    }

    /// `signature_request.remove`: removes the caller's access to a completed request.
    pub fn remove(&self, signature_request_id: impl Into<String>) -> Dispatch {
        self.client.execute(
            Operation::SignatureRequestRemove,
            Self::with_id(signature_request_id),
        )
    }

    /// `signature_request.download`: streams the documents.
    ///
    /// `file_type` is `pdf` (merged document) or `zip` (one file per document);
    /// the service defaults to `pdf`.
    pub fn download(
        &self,
        signature_request_id: impl Into<String>,
        file_type: Option<&str>,
    ) -> Dispatch {
        let mut args = Self::with_id(signature_request_id);
        if let Some(file_type) = file_type {
            args = args.field("file_type", file_type);
        }
        self.client
            .execute(Operation::SignatureRequestDownload, args)
    }

    /// `signature_request.create_embedded`: like [`send`](Self::send), signed
    /// in an iFrame; requires `client_id` and `signers`.
    pub fn create_embedded(&self, args: CallArgs) -> Dispatch {
        self.client
            .execute(Operation::SignatureRequestCreateEmbedded, args)
    }

    /// `signature_request.create_embedded_with_template`: requires `client_id`,
    /// `template_id` and `signers`.
    pub fn create_embedded_with_template(&self, args: CallArgs) -> Dispatch {
        self.client
            .execute(Operation::SignatureRequestCreateEmbeddedWithTemplate, args)
    }
}
