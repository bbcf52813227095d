#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    /// Needs a `compute` pass before it reflects its dependencies.
    #[default]
    Dirty,
    Clean,
}
