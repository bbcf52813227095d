use std::{
    any::{TypeId, type_name},
    collections::{BTreeMap, VecDeque},
    fmt::{Debug, Formatter},
    sync::Arc,
};

use flume::{Receiver, Sender};
use log::{debug, error, warn};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    Command, CommandSnapshot, Compute, Dep, Error, State, StateSyncStatus, TaskHandle, TaskId,
    Updater, dep::ComputeSlot, updater::Update,
};

/// Owner of every registered state, compute and command.
///
/// Lives on the UI thread. Commands are spawned onto the ambient tokio runtime, so
/// [`flush_commands`](Self::flush_commands) must be called from within a runtime
/// context.
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, ComputeSlot>,
    compute_order: Vec<TypeId>,
    commands: BTreeMap<TypeId, (&'static str, Arc<dyn Command>)>,
    queue: VecDeque<TypeId>,

    send: Sender<Update>,
    recv: Receiver<Update>,

    tasks: JoinSet<()>,
    running: BTreeMap<TypeId, TaskHandle>,
    generation: u64,
}

impl Debug for StateCtx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queue.len())
            .field("tasks", &self.tasks.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();

        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            compute_order: Vec::new(),
            commands: BTreeMap::new(),
            queue: VecDeque::new(),
            send,
            recv,
            tasks: JoinSet::new(),
            running: BTreeMap::new(),
            generation: 0,
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let id = TypeId::of::<T>();
        self.states.insert(id, Box::new(state));
        self.mark_dependents_dirty(id);
    }

    /// Register a compute. It starts dirty so the first
    /// [`run_computed`](Self::run_computed) initialises it.
    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        let slot = ComputeSlot {
            value: Box::new(compute),
            status: StateSyncStatus::Dirty,
        };
        if self.computes.insert(id, slot).is_none() {
            self.compute_order.push(id);
        }
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands
            .insert(TypeId::of::<T>(), (type_name::<T>(), Arc::new(command)));
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        let id = TypeId::of::<T>();
        let found = match self.states.get(&id) {
            Some(state) => state.as_any().downcast_ref::<T>(),
            None => self
                .computes
                .get(&id)
                .and_then(|slot| slot.value.as_any().downcast_ref::<T>()),
        };
        found.ok_or_else(|| Error::state_not_found(type_name::<T>(), "StateCtx::try_state"))
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access to a registered value. Computes depending on `T` are
    /// marked dirty.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        let found = match self.states.get_mut(&id) {
            Some(state) => state.as_any_mut().downcast_mut::<T>(),
            None => self
                .computes
                .get_mut(&id)
                .and_then(|slot| slot.value.as_any_mut().downcast_mut::<T>()),
        };
        found.unwrap_or_else(|| {
            panic!(
                "{}",
                Error::state_not_found(type_name::<T>(), "StateCtx::state_mut")
            )
        })
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>().unwrap_or_else(|| {
            panic!(
                "{}",
                Error::compute_not_found(type_name::<T>(), "StateCtx::compute")
            )
        })
    }

    pub fn is_dirty<T: Compute>(&self) -> bool {
        self.computes
            .get(&TypeId::of::<T>())
            .is_some_and(|slot| slot.status == StateSyncStatus::Dirty)
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    /// Apply every value published through an [`Updater`] since the last call.
    pub fn sync_computes(&mut self) {
        self.reap_finished_tasks();

        while let Ok((id, value)) = self.recv.try_recv() {
            if let Some(state) = self.states.get_mut(&id) {
                state.assign_box(value);
            } else if let Some(slot) = self.computes.get_mut(&id) {
                slot.value.assign_box(value);
                slot.status = StateSyncStatus::Clean;
            } else {
                warn!("Dropped update for unregistered type {id:?}");
                continue;
            }
            self.mark_dependents_dirty(id);
        }
    }

    /// Run every dirty compute once, in registration order, then apply their output.
    pub fn run_computed(&mut self) {
        let dirty: Vec<TypeId> = self
            .compute_order
            .iter()
            .copied()
            .filter(|id| {
                self.computes
                    .get(id)
                    .is_some_and(|slot| slot.status == StateSyncStatus::Dirty)
            })
            .collect();
        if dirty.is_empty() {
            return;
        }

        let updater = self.updater();
        for id in dirty {
            if let Some(slot) = self.computes.get(&id) {
                slot.value
                    .compute(Dep::new(&self.states, &self.computes), updater.clone());
            }
            if let Some(slot) = self.computes.get_mut(&id) {
                slot.status = StateSyncStatus::Clean;
            }
        }

        self.sync_computes();
    }

    pub fn enqueue_command<T: Command>(&mut self) {
        self.queue.push_back(TypeId::of::<T>());
    }

    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    /// Spawn every queued command with a fresh snapshot.
    pub fn flush_commands(&mut self) {
        while let Some(id) = self.queue.pop_front() {
            let Some((name, command)) = self
                .commands
                .get(&id)
                .map(|(name, command)| (*name, Arc::clone(command)))
            else {
                warn!("Skipped unregistered command {id:?}");
                continue;
            };

            if let Some(previous) = self.running.remove(&id)
                && !previous.is_cancelled()
            {
                debug!(
                    "Cancelling {name} generation {}",
                    previous.id().generation()
                );
                previous.cancel();
            }

            self.generation += 1;
            let token = CancellationToken::new();
            let future = command.run(self.snapshot(), self.updater(), token.clone());
            self.tasks.spawn(future);
            self.running.insert(
                id,
                TaskHandle::new(TaskId::new(id, self.generation), token),
            );
            debug!("Spawned {name} generation {}", self.generation);
        }
    }

    pub fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, state) in &self.states {
            if let Some(value) = state.snapshot() {
                snap.insert_cloned(*id, value);
            }
        }
        for (id, slot) in &self.computes {
            if let Some(value) = slot.value.snapshot() {
                snap.insert_cloned(*id, value);
            }
        }
        snap
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_set_mut(&mut self) -> &mut JoinSet<()> {
        &mut self.tasks
    }

    /// Cancel and await every in-flight command.
    pub async fn shutdown(&mut self) {
        for handle in self.running.values() {
            handle.cancel();
        }
        self.running.clear();
        self.queue.clear();
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
    }

    fn reap_finished_tasks(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result
                && err.is_panic()
            {
                error!("Command task panicked: {err}");
            }
        }
    }

    fn mark_dependents_dirty(&mut self, id: TypeId) {
        for slot in self.computes.values_mut() {
            if slot.value.deps().contains(&id) {
                slot.status = StateSyncStatus::Dirty;
            }
        }
    }
}
