use std::any::TypeId;

use crate::{Dep, State, Updater};

/// Types a compute reads. Entries may name states or other computes.
pub type ComputeDeps = Vec<TypeId>;

/// A derived value that is recalculated whenever one of its dependencies changes.
///
/// `compute` runs implicitly (on registration and after dependency changes), so it
/// must not perform side effects such as network IO. Results are published through
/// the [`Updater`]; a compute that only caches command results returns no deps and
/// leaves `compute` empty.
pub trait Compute: State {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);
}
