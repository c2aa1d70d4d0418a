use indexmap::IndexMap;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use super::ApiClientError;
use super::args::FileRef;

/// Flattens one named value into `(key, value)` text pairs.
///
/// - scalars map to their text form, `true`/`false` to `1`/`0`
/// - `null` is omitted
/// - arrays produce `name[i]`, objects `name[key]`, recursively
pub(super) fn flatten(name: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push((name.to_string(), if *flag { "1" } else { "0" }.into())),
        Value::Number(number) => out.push((name.to_string(), number.to_string())),
        Value::String(text) => out.push((name.to_string(), text.clone())),
        Value::Array(values) => {
            for (index, item) in values.iter().enumerate() {
                flatten(&format!("{name}[{index}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten(&format!("{name}[{key}]"), item, out);
            }
        }
    }
}

pub(super) fn flatten_all(fields: &IndexMap<String, Value>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (name, value) in fields {
        flatten(name, value, &mut out);
    }
    out
}

/// Body of an outgoing request, before files are read.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum CallBody {
    /// No body.
    Empty,
    /// `application/json` document.
    Json(Value),
    /// `multipart/form-data` with flattened text parts and file parts.
    Multipart(MultipartBody),
}

/// Flattened multipart form: text parts in argument order, then `file[i]` parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct MultipartBody {
    pub(super) fields: Vec<(String, String)>,
    pub(super) files: Vec<FileRef>,
}

impl MultipartBody {
    pub(super) fn new(fields: &IndexMap<String, Value>, files: Vec<FileRef>) -> Self {
        Self {
            fields: flatten_all(fields),
            files,
        }
    }

    /// Name of every part, in wire order.
    #[cfg(test)]
    pub(super) fn part_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(name, _)| name.clone())
            .chain((0..self.files.len()).map(|index| format!("file[{index}]")))
            .collect()
    }

    /// Reads every file and assembles the reqwest form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::FileNotReadable`] when a file reference is not a
    /// readable regular file.
    pub(super) async fn into_form(self) -> Result<Form, ApiClientError> {
        let Self { fields, files } = self;

        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }

        for (index, file) in files.iter().enumerate() {
            let data = read_file(file).await?;
            debug!(path = %file.path().display(), size = data.len(), "attaching file");
            let part = Part::bytes(data)
                .file_name(file.file_name())
                .mime_str(file.mime_type().as_ref())?;
            form = form.part(format!("file[{index}]"), part);
        }

        Ok(form)
    }
}

async fn read_file(file: &FileRef) -> Result<Vec<u8>, ApiClientError> {
    let not_readable = |reason: String| ApiClientError::FileNotReadable {
        path: file.path().display().to_string(),
        reason,
    };

    let metadata = tokio::fs::metadata(file.path())
        .await
        .map_err(|err| not_readable(err.to_string()))?;
    if !metadata.is_file() {
        return Err(not_readable("not a regular file".to_string()));
    }

    tokio::fs::read(file.path())
        .await
        .map_err(|err| not_readable(err.to_string()))
}
