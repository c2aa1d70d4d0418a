use http::Method;

/// Default body encoding of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BodyEncoding {
    /// `application/json` body (or query string for `GET`).
    #[display("json")]
    Json,
    /// `multipart/form-data` body.
    #[display("multipart")]
    Multipart,
}

/// Expected kind of successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// A JSON document.
    Json,
    /// A file download exposed as a byte stream.
    Download,
}

/// Post-processing applied to the normalized outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Outcome delivered as is.
    None,
    /// Failures are delivered or swallowed depending on the client [`CancelPolicy`](crate::CancelPolicy).
    CancelPolicy,
}

/// Static description of one remote operation's HTTP shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Public operation name, e.g. `signature_request.send`.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template relative to the API base URL, with `{param}` placeholders.
    pub path_template: &'static str,
    /// Default encoding when no file is attached.
    pub encoding: BodyEncoding,
    /// Fields that must be present and non-empty.
    pub required_fields: &'static [&'static str],
    /// Expected response.
    pub response: ResponseKind,
    /// Outcome post-processing.
    pub hook: Hook,
}

impl ResourceDescriptor {
    const fn new(
        name: &'static str,
        method: Method,
        path_template: &'static str,
        required_fields: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            method,
            path_template,
            encoding: BodyEncoding::Json,
            required_fields,
            response: ResponseKind::Json,
            hook: Hook::None,
        }
    }

    const fn multipart(mut self) -> Self {
        self.encoding = BodyEncoding::Multipart;
        self
    }

    const fn download(mut self) -> Self {
        self.response = ResponseKind::Download;
        self
    }

    const fn hook(mut self, hook: Hook) -> Self {
        self.hook = hook;
        self
    }

    /// Returns `true` when remaining arguments travel in the query string.
    pub fn uses_query(&self) -> bool {
        self.method == Method::GET || self.method == Method::DELETE
    }
}

macro_rules! operations {
    ($($(#[$meta:meta])* $variant:ident => $descriptor:expr;)+) => {
        /// Every operation known to the client.
        ///
        /// The enum is the static method table: [`Operation::descriptor`] gives the
        /// HTTP shape and [`Operation::from_name`] resolves the public name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Operation {
            $($(#[$meta])* $variant,)+
        }

        impl Operation {
            /// All operations, in table order.
            pub const ALL: &'static [Operation] = &[$(Operation::$variant,)+];

            /// Returns the static descriptor of this operation.
            pub fn descriptor(self) -> &'static ResourceDescriptor {
                match self {
                    $(Operation::$variant => {
                        static DESCRIPTOR: ResourceDescriptor = $descriptor;
                        &DESCRIPTOR
                    })+
                }
            }
        }
    };
}

operations! {
    /// `GET /signature_request/{signature_request_id}`
    SignatureRequestGet => ResourceDescriptor::new(
        "signature_request.get",
        Method::GET,
        "/signature_request/{signature_request_id}",
        &["signature_request_id"],
    );
    /// `GET /signature_request/list`
    SignatureRequestList => ResourceDescriptor::new(
        "signature_request.list",
        Method::GET,
        "/signature_request/list",
        &[],
    );
    /// `POST /signature_request/send`
    SignatureRequestSend => ResourceDescriptor::new(
        "signature_request.send",
        Method::POST,
        "/signature_request/send",
        &["signers"],
    ).multipart();
    /// `POST /signature_request/send_with_template`
    SignatureRequestSendWithTemplate => ResourceDescriptor::new(
        "signature_request.send_with_template",
        Method::POST,
        "/signature_request/send_with_template",
        &["template_id", "signers"],
    );
    /// `POST /signature_request/remind/{signature_request_id}`
    SignatureRequestRemind => ResourceDescriptor::new(
        "signature_request.remind",
        Method::POST,
        "/signature_request/remind/{signature_request_id}",
        &["signature_request_id", "email_address"],
    );
    /// `POST /signature_request/update/{signature_request_id}`
    SignatureRequestUpdate => ResourceDescriptor::new(
        "signature_request.update",
        Method::POST,
        "/signature_request/update/{signature_request_id}",
        &["signature_request_id", "signature_id", "email_address"],
    );
    /// `POST /signature_request/cancel/{signature_request_id}`
    SignatureRequestCancel => ResourceDescriptor::new(
        "signature_request.cancel",
        Method::POST,
        "/signature_request/cancel/{signature_request_id}",
        &["signature_request_id"],
    ).hook(Hook::CancelPolicy);
    /// `POST /signature_request/remove/{signature_request_id}`
    SignatureRequestRemove => ResourceDescriptor::new(
        "signature_request.remove",
        Method::POST,
        "/signature_request/remove/{signature_request_id}",
        &["signature_request_id"],
    );
    /// `GET /signature_request/files/{signature_request_id}`
    SignatureRequestDownload => ResourceDescriptor::new(
        "signature_request.download",
        Method::GET,
        "/signature_request/files/{signature_request_id}",
        &["signature_request_id"],
    ).download();
    /// `POST /signature_request/create_embedded`
    SignatureRequestCreateEmbedded => ResourceDescriptor::new(
        "signature_request.create_embedded",
        Method::POST,
        "/signature_request/create_embedded",
        &["client_id", "signers"],
    ).multipart();
    /// `POST /signature_request/create_embedded_with_template`
    SignatureRequestCreateEmbeddedWithTemplate => ResourceDescriptor::new(
        "signature_request.create_embedded_with_template",
        Method::POST,
        "/signature_request/create_embedded_with_template",
        &["client_id", "template_id", "signers"],
    );
    /// `GET /template/list`
    TemplateList => ResourceDescriptor::new(
        "template.list",
        Method::GET,
        "/template/list",
        &[],
    );
    /// `GET /template/{template_id}`
    TemplateGet => ResourceDescriptor::new(
        "template.get",
        Method::GET,
        "/template/{template_id}",
        &["template_id"],
    );
    /// `POST /template/delete/{template_id}`
    TemplateDelete => ResourceDescriptor::new(
        "template.delete",
        Method::POST,
        "/template/delete/{template_id}",
        &["template_id"],
    );
    /// `GET /template/files/{template_id}`
    TemplateFiles => ResourceDescriptor::new(
        "template.files",
        Method::GET,
        "/template/files/{template_id}",
        &["template_id"],
    ).download();
    /// `GET /embedded/sign_url/{signature_id}`
    EmbeddedSignUrl => ResourceDescriptor::new(
        "embedded.sign_url",
        Method::GET,
        "/embedded/sign_url/{signature_id}",
        &["signature_id"],
    );
    /// `GET /embedded/edit_url/{template_id}`
    EmbeddedEditUrl => ResourceDescriptor::new(
        "embedded.edit_url",
        Method::GET,
        "/embedded/edit_url/{template_id}",
        &["template_id"],
    );
}

impl Operation {
    /// Resolves an operation from its public name, e.g. `template.list`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|operation| operation.descriptor().name == name)
    }

    /// Public name of the operation.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
