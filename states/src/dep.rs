use std::{
    any::{TypeId, type_name},
    collections::BTreeMap,
};

use crate::{Compute, State, StateSyncStatus};

pub(crate) struct ComputeSlot {
    pub(crate) value: Box<dyn Compute>,
    pub(crate) status: StateSyncStatus,
}

/// Read-only view of the context handed to [`Compute::compute`].
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, Box<dyn State>>,
    computes: &'a BTreeMap<TypeId, ComputeSlot>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a BTreeMap<TypeId, Box<dyn State>>,
        computes: &'a BTreeMap<TypeId, ComputeSlot>,
    ) -> Self {
        Self { states, computes }
    }

    pub fn try_state<T: State>(&self) -> Option<&'a T> {
        let id = TypeId::of::<T>();
        if let Some(state) = self.states.get(&id) {
            return state.as_any().downcast_ref::<T>();
        }
        self.computes
            .get(&id)
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never registered in the context.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` was never recorded as a compute.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }
}
