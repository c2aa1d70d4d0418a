use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::ApiClientError;

/// Reference to a local file uploaded as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: PathBuf,
    file_name: Option<String>,
}

impl FileRef {
    /// Creates a reference to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_name: None,
        }
    }

    /// Overrides the file name sent to the service.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Local path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name sent to the service: the explicit one or the last path component.
    pub fn file_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string())
        })
    }

    /// MIME type inferred from the file extension.
    pub fn mime_type(&self) -> mime::Mime {
        let extension = Path::new(&self.file_name())
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => mime::APPLICATION_PDF,
            Some("txt") => mime::TEXT_PLAIN,
            Some("json") => mime::APPLICATION_JSON,
            Some("png") => mime::IMAGE_PNG,
            Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
            Some("gif") => mime::IMAGE_GIF,
            _ => mime::APPLICATION_OCTET_STREAM,
        }
    }
}

impl From<&str> for FileRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FileRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<PathBuf> for FileRef {
    fn from(value: PathBuf) -> Self {
        Self::new(value)
    }
}

impl From<&Path> for FileRef {
    fn from(value: &Path) -> Self {
        Self::new(value)
    }
}

/// Arguments of one operation call.
///
/// Fields keep their insertion order, which is also the order of the
/// flattened multipart parts. Files are kept apart from the fields.
///
/// # Example
///
/// ```rust
/// use hellosign_client::CallArgs;
/// use serde_json::json;
///
/// let args = CallArgs::new()
///     .field("title", "NDA with Acme Co.")
///     .field("test_mode", 1)
///     .field("signers", json!([{ "email_address": "jack@example.com", "name": "Jack" }]))
///     .file("docs/nda.pdf");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub(super) fields: IndexMap<String, Value>,
    pub(super) files: Vec<FileRef>,
}

impl CallArgs {
    /// Creates empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets a field from any serializable value (signer lists, metadata maps, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized to JSON.
    pub fn serialized<T: Serialize>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, ApiClientError> {
        self.fields.insert(name.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Attaches a file.
    #[must_use]
    pub fn file(mut self, file: impl Into<FileRef>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Attaches several files.
    #[must_use]
    pub fn files<I, F>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FileRef>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Builds arguments from a JSON object.
    ///
    /// A `files` (or `file`) entry holding a path or a list of paths becomes
    /// file references; every other entry is kept as a field.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, or if `files` holds
    /// something other than strings.
    pub fn from_json(value: Value) -> Result<Self, ApiClientError> {
        let Value::Object(map) = value else {
            return Err(ApiClientError::InvalidArguments {
                message: "call arguments must be a JSON object".to_string(),
            });
        };

        let mut args = Self::new();
        for (name, value) in map {
            if name == "files" || name == "file" {
                args.files.extend(Self::file_refs(value)?);
            } else {
                args.fields.insert(name, value);
            }
        }
        Ok(args)
    }

    fn file_refs(value: Value) -> Result<Vec<FileRef>, ApiClientError> {
        let values = match value {
            Value::Array(values) => values,
            other => vec![other],
        };
        values
            .into_iter()
            .map(|value| match value {
                Value::String(path) => Ok(FileRef::new(path)),
                other => Err(ApiClientError::InvalidArguments {
                    message: format!("file reference must be a path, got {other}"),
                }),
            })
            .collect()
    }

    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if any file is attached.
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Attached files.
    pub fn attached_files(&self) -> &[FileRef] {
        &self.files
    }

    /// Returns `true` when `name` is present and non-empty.
    ///
    /// `files`/`file` are satisfied by attached file references.
    pub(super) fn is_provided(&self, name: &str) -> bool {
        if (name == "files" || name == "file") && self.has_files() {
            return true;
        }
        self.fields.get(name).is_some_and(|value| !is_empty(value))
    }

    pub(super) fn take(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }
}

pub(super) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
