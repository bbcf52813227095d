//! HTTP round-trips for open form dialogs.
//!
//! [`FormDialogs`](super::FormDialogs) produces a [`FormRequest`]; the UI stores it in
//! [`FormRequestInput`] and enqueues [`SendFormRequestCommand`]. The result lands in
//! [`FormRequestCompute`], which the dialogs read back by sequence number.

use std::any::Any;

use log::{debug, info, warn};
use serde_json::Value;
use stockroom_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State, StateCtx, Updater,
    state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use super::DialogId;
use crate::{
    BusinessConfig,
    error::{ApiError, ApiResult, check_status},
    http::{Client, Method},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// GET of the record an edit form starts from.
    Load,
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormRequest {
    pub dialog: DialogId,
    /// Increases with every request made by one [`FormDialogs`](super::FormDialogs).
    pub seq: u64,
    pub phase: RequestPhase,
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub expected: &'static [u16],
}

#[derive(Debug, Clone, Default)]
pub struct FormRequestInput {
    pub request: Option<FormRequest>,
}

impl State for FormRequestInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Default)]
pub enum FormRequestStatus {
    #[default]
    Idle,
    InFlight {
        dialog: DialogId,
        seq: u64,
    },
    Done {
        dialog: DialogId,
        seq: u64,
        result: ApiResult<Value>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FormRequestCompute {
    pub status: FormRequestStatus,
}

impl FormRequestCompute {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.status, FormRequestStatus::InFlight { .. })
    }
}

impl State for FormRequestCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

impl Compute for FormRequestCompute {
    fn deps(&self) -> ComputeDeps {
        Vec::new()
    }

    // Written by `SendFormRequestCommand` only.
    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}
}

/// Store `request` and queue the command sending it.
///
/// Sending a new request cancels one still in flight.
pub fn dispatch_form_request(ctx: &mut StateCtx, request: FormRequest) {
    ctx.update::<FormRequestInput>(|input| input.request = Some(request));
    ctx.enqueue_command::<SendFormRequestCommand>();
}

/// Send `method url` with an optional JSON body and return the parsed response body.
///
/// An empty body (typical for `204`) yields `Value::Null`.
pub async fn send_form_request(
    config: &BusinessConfig,
    method: Method,
    url: &str,
    body: Option<&Value>,
    expected: &[u16],
) -> ApiResult<Value> {
    let mut request = Client::request(method, url)
        .header("accept", "application/json")
        .header_opt("authorization", config.authorization());
    if let Some(body) = body {
        request = request
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
    }

    let response = request.send().await?;
    check_status(&response, expected)?;

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    response.json().map_err(|e| ApiError::Decode {
        what: "form response",
        message: e.to_string(),
    })
}

/// Manual-only command sending the request stored in [`FormRequestInput`].
#[derive(Debug, Default)]
pub struct SendFormRequestCommand;

impl Command for SendFormRequestCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<FormRequestInput>().clone();
        let config = snap.state::<BusinessConfig>().clone();

        Box::pin(async move {
            let Some(request) = input.request else {
                warn!("SendFormRequestCommand dispatched without a request");
                return;
            };
            let (dialog, seq) = (request.dialog, request.seq);

            updater.set(FormRequestCompute {
                status: FormRequestStatus::InFlight { dialog, seq },
            });
            info!("{dialog}: {} {}", request.method, request.url);

            let result = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("{dialog}: request {seq} cancelled");
                    return;
                }
                result = send_form_request(
                    &config,
                    request.method,
                    &request.url,
                    request.body.as_ref(),
                    request.expected,
                ) => result,
            };

            if let Err(err) = &result {
                warn!("{dialog}: request {seq} failed: {err}");
            }
            updater.set(FormRequestCompute {
                status: FormRequestStatus::Done {
                    dialog,
                    seq,
                    result,
                },
            });
        })
    }
}
