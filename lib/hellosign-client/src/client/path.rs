use std::sync::LazyLock;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;

use super::ApiClientError;
use super::args::{CallArgs, is_empty};

/// Regular expression for matching path parameters in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn encode_path_param_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn path_value(value: &Value) -> Option<String> {
    if is_empty(value) {
        return None;
    }
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A path template with every placeholder substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PathResolved {
    pub(super) path: String,
}

impl PathResolved {
    /// Substitutes `{name}` placeholders of `template` with values taken out of `args`.
    ///
    /// Consumed fields are removed from `args` so they are not sent again in the body.
    /// Every unresolved placeholder is reported at once.
    pub(super) fn resolve(template: &str, args: &mut CallArgs) -> Result<Self, ApiClientError> {
        let mut names: Vec<&str> = Vec::new();
        for name in RE
            .captures_iter(template)
            .filter_map(|caps| caps.name("name"))
            .map(|m| m.as_str())
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let mut path = template.to_string();
        let mut missings = Vec::new();
        for name in names {
            match args.get(name).and_then(path_value) {
                Some(value) => {
                    args.take(name);
                    path = replace_path_param(&path, name, &encode_path_param_value(&value));
                }
                None => missings.push(name.to_string()),
            }
        }

        if missings.is_empty() {
            Ok(Self { path })
        } else {
            Err(ApiClientError::MissingPathParam {
                path: template.to_string(),
                missings,
            })
        }
    }
}
