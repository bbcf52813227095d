//! Modal API forms.
//!
//! A table describes a form with [`ApiFormProps`] and hands it to a [`FormHost`], then awaits
//! the [`FormOutcome`]. [`ModalFormHost`] forwards each request to the UI thread, where
//! [`FormDialogs`] runs the dialog and its HTTP round-trips through
//! [`SendFormRequestCommand`].

mod dialogs;
mod host;
mod request;

pub use dialogs::{DialogPhase, FormDialogs, OpenDialog};
pub use host::{DialogId, DialogRequest, FormHost, ModalFormHost, dialog_channel};
pub use request::{
    FormRequest, FormRequestCompute, FormRequestInput, FormRequestStatus, RequestPhase,
    SendFormRequestCommand, dispatch_form_request, send_form_request,
};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    BusinessConfig,
    api_paths::{ApiPaths, Pk, api_url},
    error::ApiError,
    http::Method,
    i18n::MessageKey,
};

/// Ordered field names shown by a form. Every field is a plain text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<&'static str>,
    labels: BTreeMap<&'static str, MessageKey>,
}

impl FieldSet {
    pub fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            names: names.into_iter().collect(),
            labels: BTreeMap::new(),
        }
    }

    /// Show `label` next to the input of `name` instead of the raw field name.
    pub fn labelled(mut self, name: &'static str, label: MessageKey) -> Self {
        self.labels.insert(name, label);
        self
    }

    pub fn label(&self, name: &str) -> Option<MessageKey> {
        self.labels.get(name).copied()
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| *n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Edit,
    Delete,
}

impl FormKind {
    pub fn submit_method(self) -> Method {
        match self {
            Self::Create => Method::Post,
            Self::Edit => Method::Patch,
            Self::Delete => Method::Delete,
        }
    }

    /// Status codes accepted as success for the submit request.
    pub fn success_statuses(self) -> &'static [u16] {
        match self {
            Self::Create => &[200, 201],
            Self::Edit => &[200],
            Self::Delete => &[200, 202, 204],
        }
    }
}

/// Everything a host needs to show one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFormProps {
    pub kind: FormKind,
    pub url: ApiPaths,
    /// Target record for edit and delete forms.
    pub pk: Option<Pk>,
    pub title: MessageKey,
    pub fields: FieldSet,
    pub success_message: MessageKey,
    /// Text shown above the fields.
    pub pre_form_content: Option<MessageKey>,
}

impl ApiFormProps {
    pub fn endpoint(&self, config: &BusinessConfig) -> String {
        api_url(config, self.url, self.pk)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("form dialog host closed")]
    HostClosed,
}

/// How a form ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    Submitted(T),
    Cancelled,
    Failed(FormError),
}

impl<T> FormOutcome<T> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FormOutcome<U> {
        match self {
            Self::Submitted(value) => FormOutcome::Submitted(f(value)),
            Self::Cancelled => FormOutcome::Cancelled,
            Self::Failed(err) => FormOutcome::Failed(err),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> FormOutcome<U>) -> FormOutcome<U> {
        match self {
            Self::Submitted(value) => f(value),
            Self::Cancelled => FormOutcome::Cancelled,
            Self::Failed(err) => FormOutcome::Failed(err),
        }
    }
}

/// Decode a submitted JSON body into a record.
pub fn decode_submitted<T: serde::de::DeserializeOwned>(
    outcome: FormOutcome<Value>,
) -> FormOutcome<T> {
    outcome.and_then(|value| match serde_json::from_value(value) {
        Ok(record) => FormOutcome::Submitted(record),
        Err(err) => FormOutcome::Failed(FormError::Decode(err.to_string())),
    })
}
