//! State runtime shared by the business and UI layers.
//!
//! - `State`: plain values addressed by type
//! - `Compute`: derived values recalculated when their dependencies change
//! - `Command`: manual-only side effects spawned onto tokio, reporting back via `Updater`

mod basic_state;
mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use basic_state::Time;
pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use snapshot::CommandSnapshot;
pub use state::{State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use updater::{Update, Updater};

#[cfg(test)]
mod state_runtime_test {
    use std::any::{Any, TypeId};
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {
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

    #[derive(Debug, Default, Clone)]
    struct Doubled {
        value: i32,
        runs: u32,
    }

    impl State for Doubled {
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

    impl Compute for Doubled {
        fn deps(&self) -> ComputeDeps {
            vec![TypeId::of::<Counter>()]
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let counter = deps.get_state_ref::<Counter>();
            updater.set(Self {
                value: counter.value * 2,
                runs: self.runs + 1,
            });
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Echo {
        seen: Option<i32>,
    }

    impl State for Echo {
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

    impl Compute for Echo {
        fn deps(&self) -> ComputeDeps {
            Vec::new()
        }

        fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}
    }

    struct EchoCommand;

    impl Command for EchoCommand {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let value = snap.state::<Counter>().value;
            Box::pin(async move {
                updater.set(Echo { seen: Some(value) });
            })
        }
    }

    struct SlowCommand;

    impl Command for SlowCommand {
        fn run(
            &self,
            _snap: CommandSnapshot,
            updater: Updater,
            cancel: CancellationToken,
        ) -> CommandFuture {
            Box::pin(async move {
                tokio::select! {
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(Duration::from_secs(60)) => {
                        updater.set(Echo { seen: Some(-1) });
                    }
                }
            })
        }
    }

    fn setup_ctx() -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.record_compute(Doubled::default());
        ctx.record_compute(Echo::default());
        ctx.record_command(EchoCommand);
        ctx.record_command(SlowCommand);
        ctx
    }

    async fn flush_and_wait(ctx: &mut StateCtx) {
        ctx.flush_commands();
        while ctx.task_count() > 0 {
            if ctx.task_set_mut().join_next().await.is_some() {
                ctx.sync_computes();
            }
        }
        ctx.sync_computes();
    }

    #[test]
    fn update_applies_to_state() {
        let mut ctx = setup_ctx();
        ctx.update::<Counter>(|c| c.value = 42);
        assert_eq!(ctx.state::<Counter>().value, 42);
    }

    #[test]
    fn updater_values_apply_on_sync() {
        let mut ctx = setup_ctx();
        ctx.updater().set(Counter { value: 7 });

        assert_eq!(ctx.state::<Counter>().value, 0, "not applied before sync");
        ctx.sync_computes();
        assert_eq!(ctx.state::<Counter>().value, 7);
    }

    #[test]
    fn compute_runs_initially_and_after_dependency_change() {
        let mut ctx = setup_ctx();
        assert!(ctx.is_dirty::<Doubled>());

        ctx.run_computed();
        assert_eq!(ctx.compute::<Doubled>().runs, 1);
        assert!(!ctx.is_dirty::<Doubled>());

        // Nothing changed: no rerun.
        ctx.run_computed();
        assert_eq!(ctx.compute::<Doubled>().runs, 1);

        ctx.update::<Counter>(|c| c.value = 5);
        assert!(ctx.is_dirty::<Doubled>());
        ctx.run_computed();
        assert_eq!(ctx.compute::<Doubled>().value, 10);
        assert_eq!(ctx.compute::<Doubled>().runs, 2);
    }

    #[test]
    fn missing_state_is_reported() {
        let ctx = StateCtx::new();
        let err = ctx.try_state::<Counter>().unwrap_err();
        assert!(matches!(err, Error::StateNotFound { .. }));
        assert!(ctx.cached::<Doubled>().is_none());
    }

    #[tokio::test]
    async fn command_reads_snapshot_and_publishes_result() {
        let mut ctx = setup_ctx();
        ctx.update::<Counter>(|c| c.value = 3);
        ctx.enqueue_command::<EchoCommand>();

        flush_and_wait(&mut ctx).await;

        assert_eq!(ctx.compute::<Echo>().seen, Some(3));
    }

    #[tokio::test]
    async fn snapshot_is_taken_at_flush_time() {
        let mut ctx = setup_ctx();
        ctx.enqueue_command::<EchoCommand>();
        ctx.update::<Counter>(|c| c.value = 9);

        flush_and_wait(&mut ctx).await;

        assert_eq!(ctx.compute::<Echo>().seen, Some(9));
    }

    #[tokio::test]
    async fn redispatch_cancels_previous_run() {
        let mut ctx = setup_ctx();
        ctx.dispatch::<SlowCommand>();
        ctx.dispatch::<SlowCommand>();
        assert_eq!(ctx.task_count(), 2);

        // The first run observes cancellation and finishes; the second is still pending.
        let finished = ctx.task_set_mut().join_next().await;
        assert!(finished.is_some());
        assert_eq!(ctx.task_count(), 1);

        ctx.shutdown().await;
        assert_eq!(ctx.task_count(), 0);
        ctx.sync_computes();
        assert_eq!(ctx.compute::<Echo>().seen, None);
    }

    #[test]
    fn snapshot_skips_states_without_snapshot() {
        let ctx = setup_ctx();
        let snap = ctx.snapshot();

        assert!(snap.try_state::<Counter>().is_some());
        assert!(snap.try_state::<Echo>().is_none());
        assert_eq!(snap.len(), 1);
    }
}
