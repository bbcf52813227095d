use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use flume::{Receiver, Sender};
use log::{debug, warn};
use serde_json::Value;

use super::{ApiFormProps, FormError, FormOutcome};

/// Presents forms and reports how they ended.
///
/// `open_create` and `open_edit` resolve to the server's JSON body on success;
/// `open_delete` resolves to `()`.
#[async_trait]
pub trait FormHost: Send + Sync {
    async fn open_create(&self, props: ApiFormProps) -> FormOutcome<Value>;

    async fn open_edit(&self, props: ApiFormProps) -> FormOutcome<Value>;

    async fn open_delete(&self, props: ApiFormProps) -> FormOutcome<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub u64);

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

/// One form waiting to be shown, with the channel its outcome goes back on.
///
/// Dropping a request without answering resolves the caller with
/// [`FormOutcome::Cancelled`].
#[derive(Debug)]
pub struct DialogRequest {
    pub id: DialogId,
    pub props: ApiFormProps,
    reply: Sender<FormOutcome<Value>>,
}

impl DialogRequest {
    pub fn respond(self, outcome: FormOutcome<Value>) {
        debug!("Answering {} with {outcome:?}", self.id);
        if self.reply.send(outcome).is_err() {
            warn!("{} was answered after its caller went away", self.id);
        }
    }
}

/// [`FormHost`] that forwards each form to the UI thread over a channel.
#[derive(Debug, Clone)]
pub struct ModalFormHost {
    send: Sender<DialogRequest>,
    next_id: Arc<AtomicU64>,
}

pub fn dialog_channel() -> (ModalFormHost, Receiver<DialogRequest>) {
    let (send, recv) = flume::unbounded();
    (
        ModalFormHost {
            send,
            next_id: Arc::new(AtomicU64::new(1)),
        },
        recv,
    )
}

impl ModalFormHost {
    async fn request(&self, props: ApiFormProps) -> FormOutcome<Value> {
        let (reply, answer) = flume::bounded(1);
        let id = DialogId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Opening {id} ({:?})", props.kind);

        if self
            .send
            .send_async(DialogRequest { id, props, reply })
            .await
            .is_err()
        {
            return FormOutcome::Failed(FormError::HostClosed);
        }

        answer
            .recv_async()
            .await
            .unwrap_or(FormOutcome::Cancelled)
    }
}

#[async_trait]
impl FormHost for ModalFormHost {
    async fn open_create(&self, props: ApiFormProps) -> FormOutcome<Value> {
        self.request(props).await
    }

    async fn open_edit(&self, props: ApiFormProps) -> FormOutcome<Value> {
        self.request(props).await
    }

    async fn open_delete(&self, props: ApiFormProps) -> FormOutcome<()> {
        self.request(props).await.map(|_| ())
    }
}
