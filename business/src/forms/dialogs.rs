use std::collections::{BTreeMap, VecDeque};

use flume::Receiver;
use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::{
    ApiFormProps, DialogId, DialogRequest, FormError, FormKind, FormOutcome, FormRequest,
    FormRequestStatus, RequestPhase,
};
use crate::{
    BusinessConfig,
    error::{ApiError, FieldErrors},
    http::Method,
    notifications::Notifier,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Waiting for the record an edit form starts from.
    Loading,
    Editing,
    Submitting,
}

/// The dialog currently on screen.
#[derive(Debug)]
pub struct OpenDialog {
    request: DialogRequest,
    values: BTreeMap<&'static str, String>,
    field_errors: FieldErrors,
    phase: DialogPhase,
    awaiting: Option<u64>,
}

impl OpenDialog {
    fn new(request: DialogRequest) -> Self {
        let values = request
            .props
            .fields
            .names()
            .iter()
            .map(|name| (*name, String::new()))
            .collect();
        Self {
            request,
            values,
            field_errors: FieldErrors::default(),
            phase: DialogPhase::Editing,
            awaiting: None,
        }
    }

    pub fn id(&self) -> DialogId {
        self.request.id
    }

    pub fn props(&self) -> &ApiFormProps {
        &self.request.props
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    fn fill_from(&mut self, record: &Value) {
        for (field, value) in &mut self.values {
            *value = match record.get(*field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
        }
    }

    fn body(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(field, value)| (field.to_string(), Value::String(value.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Shows one form dialog at a time; later requests wait in arrival order.
#[derive(Debug)]
pub struct FormDialogs {
    recv: Receiver<DialogRequest>,
    pending: VecDeque<DialogRequest>,
    active: Option<OpenDialog>,
    notifier: Notifier,
    next_seq: u64,
}

impl FormDialogs {
    pub fn new(recv: Receiver<DialogRequest>, notifier: Notifier) -> Self {
        Self {
            recv,
            pending: VecDeque::new(),
            active: None,
            notifier,
            next_seq: 1,
        }
    }

    pub fn active(&self) -> Option<&OpenDialog> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take new requests and open the next one if nothing is on screen.
    ///
    /// Opening an edit form returns the request loading its record.
    pub fn poll(&mut self, config: &BusinessConfig) -> Option<FormRequest> {
        self.pending.extend(self.recv.try_iter());
        if self.active.is_some() {
            return None;
        }

        let mut dialog = OpenDialog::new(self.pending.pop_front()?);
        info!("Opening {} ({:?})", dialog.id(), dialog.props().kind);

        let load = if dialog.props().kind == FormKind::Edit && dialog.props().pk.is_some() {
            dialog.phase = DialogPhase::Loading;
            let url = dialog.props().endpoint(config);
            Some(self.request_for(&mut dialog, RequestPhase::Load, Method::Get, url, None, &[200]))
        } else {
            None
        };
        self.active = Some(dialog);
        load
    }

    /// Mutable text of `field`, available while the dialog is editable.
    pub fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        let dialog = self.active.as_mut()?;
        if dialog.phase != DialogPhase::Editing {
            return None;
        }
        dialog.values.get_mut(field)
    }

    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        if let Some(slot) = self.field_mut(field) {
            *slot = value.into();
        }
    }

    /// Start submitting the open dialog. Returns `None` unless it is editable.
    pub fn submit(&mut self, config: &BusinessConfig) -> Option<FormRequest> {
        let mut dialog = self.active.take()?;
        if dialog.phase != DialogPhase::Editing {
            self.active = Some(dialog);
            return None;
        }

        let kind = dialog.props().kind;
        let body = match kind {
            FormKind::Create | FormKind::Edit => Some(dialog.body()),
            FormKind::Delete => None,
        };
        let url = dialog.props().endpoint(config);
        dialog.phase = DialogPhase::Submitting;
        dialog.field_errors = FieldErrors::default();

        let request = self.request_for(
            &mut dialog,
            RequestPhase::Submit,
            kind.submit_method(),
            url,
            body,
            kind.success_statuses(),
        );
        self.active = Some(dialog);
        Some(request)
    }

    /// Whether the open dialog can be dismissed. A submitted request has to resolve first,
    /// since the server may already have applied it.
    pub fn can_cancel(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|dialog| dialog.phase != DialogPhase::Submitting)
    }

    /// Close the open dialog; its caller resolves with [`FormOutcome::Cancelled`].
    ///
    /// Ignored while submitting. Returns whether a dialog was closed.
    pub fn cancel(&mut self) -> bool {
        if !self.can_cancel() {
            if let Some(dialog) = &self.active {
                debug!("{} is submitting, cancel ignored", dialog.id());
            }
            return false;
        }
        match self.active.take() {
            Some(dialog) => {
                info!("{} cancelled", dialog.id());
                dialog.request.respond(FormOutcome::Cancelled);
                true
            }
            None => false,
        }
    }

    /// Apply the result of the request the open dialog is waiting on.
    ///
    /// Results for other dialogs or superseded requests are ignored.
    pub fn apply(&mut self, status: &FormRequestStatus) {
        let FormRequestStatus::Done {
            dialog: id,
            seq,
            result,
        } = status
        else {
            return;
        };
        let Some(dialog) = self.active.as_mut() else {
            return;
        };
        if dialog.id() != *id || dialog.awaiting != Some(*seq) {
            return;
        }
        dialog.awaiting = None;

        match (dialog.phase, result) {
            (DialogPhase::Loading, Ok(record)) => {
                dialog.fill_from(record);
                dialog.phase = DialogPhase::Editing;
            }
            (DialogPhase::Submitting, Ok(body)) => {
                self.close(FormOutcome::Submitted(body.clone()));
            }
            (DialogPhase::Submitting, Err(ApiError::Validation(errors))) => {
                debug!("{id}: validation errors {errors:?}");
                dialog.field_errors = errors.clone();
                dialog.phase = DialogPhase::Editing;
            }
            (_, Err(err)) => {
                self.notifier.error(err.to_string());
                self.close(FormOutcome::Failed(FormError::Api(err.clone())));
            }
            (DialogPhase::Editing, Ok(_)) => {
                warn!("{id}: response arrived while editing");
            }
        }
    }

    fn close(&mut self, outcome: FormOutcome<Value>) {
        if let Some(dialog) = self.active.take() {
            dialog.request.respond(outcome);
        }
    }

    fn request_for(
        &mut self,
        dialog: &mut OpenDialog,
        phase: RequestPhase,
        method: Method,
        url: String,
        body: Option<Value>,
        expected: &'static [u16],
    ) -> FormRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        dialog.awaiting = Some(seq);
        FormRequest {
            dialog: dialog.id(),
            seq,
            phase,
            method,
            url,
            body,
            expected,
        }
    }
}
