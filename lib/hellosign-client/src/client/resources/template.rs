use serde_json::Value;

use crate::client::{ApiClient, CallArgs, Dispatch, Operation};

/// Template operations, see [`ApiClient::template`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl TemplateApi<'_> {
    fn with_id(template_id: impl Into<String>) -> CallArgs {
        CallArgs::new().field("template_id", Value::String(template_id.into()))
    }

    /// `template.list`: first page of the account's templates.
    pub fn list(&self) -> Dispatch {
        self.list_with(CallArgs::new())
    }

    /// `template.list` with paging or search arguments.
    pub fn list_with(&self, args: CallArgs) -> Dispatch {
        self.client.execute(Operation::TemplateList, args)
    }

    /// `template.get`
    pub fn get(&self, template_id: impl Into<String>) -> Dispatch {
        self.client
            .execute(Operation::TemplateGet, Self::with_id(template_id))
    }

    /// `template.delete`
    pub fn delete(&self, template_id: impl Into<String>) -> Dispatch {
        self.client
            .execute(Operation::TemplateDelete, Self::with_id(template_id))
    }

    /// `template.files`: streams the template documents (`pdf` or `zip`).
    pub fn files(&self, template_id: impl Into<String>, file_type: Option<&str>) -> Dispatch {
        let mut args = Self::with_id(template_id);
        if let Some(file_type) = file_type {
            args = args.field("file_type", file_type);
        }
        self.client.execute(Operation::TemplateFiles, args)
    }
}
