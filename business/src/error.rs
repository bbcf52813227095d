//! Errors returned by REST calls.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::http::{HttpError, Response};

/// Validation messages from a `400` response, keyed by field name.
///
/// Keys `non_field_errors` and `detail` are collected into [`non_field`](Self::non_field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl FieldErrors {
    /// Parse a validation body. Returns `None` when the body is not a JSON object or
    /// carries no messages.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let Value::Object(map) = serde_json::from_slice::<Value>(body).ok()? else {
            return None;
        };

        let mut errors = Self::default();
        for (key, value) in map {
            let messages = messages_of(&value);
            if messages.is_empty() {
                continue;
            }
            if key == "non_field_errors" || key == "detail" {
                errors.non_field.extend(messages);
            } else {
                errors.fields.entry(key).or_default().extend(messages);
            }
        }

        (!errors.is_empty()).then_some(errors)
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self.non_field.clone();
        for (field, messages) in &self.fields {
            parts.push(format!("{field}: {}", messages.join(" ")));
        }
        f.write_str(&parts.join("; "))
    }
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(messages_of).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API returned status: {status}")]
    Status { status: u16, body: String },

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("failed to parse {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("failed to serialize request: {0}")]
    Encode(String),
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Map a response to an error unless its status is one of `expected`.
///
/// A `400` with a field-keyed body becomes [`ApiError::Validation`].
pub fn check_status(response: &Response, expected: &[u16]) -> ApiResult<()> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 400
        && let Some(errors) = FieldErrors::from_body(&response.body)
    {
        return Err(ApiError::Validation(errors));
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.text_lossy(),
    })
}
