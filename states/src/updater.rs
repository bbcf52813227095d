use std::any::{Any, TypeId, type_name};

use flume::Sender;
use log::warn;

use crate::State;

/// A pending replacement value keyed by the type it replaces.
pub type Update = (TypeId, Box<dyn Any + Send>);

/// Send-safe handle used by computes and commands to publish new values.
///
/// Values are applied on the owning thread by [`StateCtx::sync_computes`](crate::StateCtx::sync_computes).
#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    pub fn set<T: State + Send>(&self, value: T) {
        if self
            .send
            .send((TypeId::of::<T>(), Box::new(value)))
            .is_err()
        {
            warn!(
                "Dropped update for {}: state context is gone",
                type_name::<T>()
            );
        }
    }
}
