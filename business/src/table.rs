//! Shared table contract: identity, columns, sorting, actions and list queries.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use log::debug;
use ustr::Ustr;

use crate::{api_paths::Pk, i18n::MessageKey};

static NEXT_TABLE_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Identity of one mounted table.
///
/// Two tables created with the same name still get distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    name: Ustr,
    instance: u64,
}

impl TableKey {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }
}

impl std::fmt::Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.instance)
    }
}

/// Handle used to request a reload of a table's data.
///
/// Clones share the same refresh generation; the table view refetches whenever the
/// generation moves past the one it last loaded.
#[derive(Debug, Clone)]
pub struct TableController {
    key: TableKey,
    generation: Arc<AtomicU64>,
}

impl TableController {
    pub fn new(name: &str) -> Self {
        Self {
            key: TableKey {
                name: Ustr::from(name),
                instance: NEXT_TABLE_INSTANCE.fetch_add(1, Ordering::Relaxed),
            },
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn key(&self) -> TableKey {
        self.key
    }

    pub fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Refresh requested for table {} (generation {generation})", self.key);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl PartialEq for TableController {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TableController {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    /// Record field shown in this column.
    pub accessor: &'static str,
    pub sortable: bool,
    /// Header text; `None` uses the accessor.
    pub title: Option<MessageKey>,
}

impl TableColumn {
    pub const fn sortable(accessor: &'static str) -> Self {
        Self {
            accessor,
            sortable: true,
            title: None,
        }
    }

    pub const fn plain(accessor: &'static str) -> Self {
        Self {
            accessor,
            sortable: false,
            title: None,
        }
    }

    pub const fn titled(mut self, title: MessageKey) -> Self {
        self.title = Some(title);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub accessor: &'static str,
    pub direction: SortDirection,
}

impl TableSort {
    /// Value of the `ordering` query parameter: `code` or `-code`.
    pub fn ordering_param(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.accessor.to_string(),
            SortDirection::Descending => format!("-{}", self.accessor),
        }
    }
}

/// Sort state after clicking the header of `accessor`.
///
/// Clicking the sorted column flips its direction, clicking another sortable column sorts
/// it ascending, and non-sortable columns leave the state unchanged.
pub fn toggle_sort(
    columns: &[TableColumn],
    current: Option<TableSort>,
    accessor: &str,
) -> Option<TableSort> {
    let Some(column) = columns
        .iter()
        .find(|c| c.accessor == accessor && c.sortable)
    else {
        return current;
    };

    match current {
        Some(sort) if sort.accessor == column.accessor => Some(TableSort {
            accessor: sort.accessor,
            direction: match sort.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            },
        }),
        _ => Some(TableSort {
            accessor: column.accessor,
            direction: SortDirection::Ascending,
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActionKind {
    Edit,
    Delete,
}

impl RowActionKind {
    pub fn title(self) -> MessageKey {
        match self {
            Self::Edit => MessageKey::Edit,
            Self::Delete => MessageKey::Delete,
        }
    }
}

/// Per-row menu entry, bound to the record it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction {
    pub kind: RowActionKind,
    pub pk: Pk,
}

impl RowAction {
    pub fn title(&self) -> MessageKey {
        self.kind.title()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableActionKind {
    Add,
}

/// Toolbar button shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableAction {
    pub kind: TableActionKind,
    pub tooltip: MessageKey,
}

/// A record the generic table can render.
pub trait TableRecord {
    fn pk(&self) -> Pk;

    /// Display text for the column named `accessor`.
    fn cell(&self, accessor: &str) -> Option<&str>;
}

/// Parameters sent with a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub ordering: Option<TableSort>,
    pub search: String,
}

impl ListQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(sort) = self.ordering {
            params.push(("ordering", sort.ordering_param()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        params
    }
}
