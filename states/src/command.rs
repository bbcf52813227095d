use std::{future::Future, pin::Pin};

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A manual-only side effect, such as a network request.
///
/// Commands never run implicitly. They are queued with
/// [`StateCtx::enqueue_command`](crate::StateCtx::enqueue_command) and spawned by
/// [`StateCtx::flush_commands`](crate::StateCtx::flush_commands). Results travel
/// back through the [`Updater`].
///
/// Flushing a command while a previous run of the same command is still in flight
/// cancels the previous run's token, so long-running commands should race their
/// work against `cancel.cancelled()`.
pub trait Command: Send + Sync + 'static {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture;
}
