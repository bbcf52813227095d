use std::any::{Any, type_name};

use log::warn;

/// A value stored in [`StateCtx`](crate::StateCtx) and addressed by its type.
pub trait State: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Cloned copy handed to commands through a
    /// [`CommandSnapshot`](crate::CommandSnapshot).
    ///
    /// States that no command reads can keep the default and stay out of
    /// snapshots entirely.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Replace `self` with a value produced by an [`Updater`](crate::Updater).
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body: downcast and overwrite, ignoring mismatched types.
pub fn state_assign_impl<T: State>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => warn!(
            "Ignored update with mismatched type for state {}",
            type_name::<T>()
        ),
    }
}
