//! Generic record table used by the settings pages.
//!
//! - `columns`: column widths
//! - `header`: header row with sort buttons
//! - `row`: record rows with their action buttons

mod columns;
mod header;
mod row;

use egui::{Layout, Ui};
use egui_extras::TableBuilder;
use stockroom_business::{
    I18n,
    table::{RowAction, TableColumn, TableRecord, TableSort},
};

use columns::{HEADER_HEIGHT, ROW_HEIGHT, table_columns};
use header::render_table_header;
use row::render_record_row;

/// What the user did with the table this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataTableResponse {
    /// Accessor of the sortable header that was clicked.
    pub sort_clicked: Option<&'static str>,
    pub action: Option<RowAction>,
}

/// Renders `records` under `columns`, with the actions `row_actions` returns for each row.
pub fn data_table<R: TableRecord>(
    ui: &mut Ui,
    id_salt: impl std::hash::Hash,
    i18n: &I18n,
    columns: &[TableColumn],
    sort: Option<TableSort>,
    records: &[R],
    row_actions: impl Fn(&R) -> Vec<RowAction>,
) -> DataTableResponse {
    let actions: Vec<Vec<RowAction>> = records.iter().map(&row_actions).collect();
    let with_actions = actions.iter().any(|a| !a.is_empty());

    let mut response = DataTableResponse::default();

    let mut table = TableBuilder::new(ui)
        .id_salt(id_salt)
        .striped(true)
        .resizable(false)
        .cell_layout(Layout::left_to_right(egui::Align::Center));
    for column in table_columns(columns.len(), with_actions) {
        table = table.column(column);
    }

    table
        .header(HEADER_HEIGHT, |mut header| {
            response.sort_clicked =
                render_table_header(&mut header, i18n, columns, sort, with_actions);
        })
        .body(|mut body| {
            for (record, actions) in records.iter().zip(&actions) {
                body.row(ROW_HEIGHT, |mut row| {
                    if let Some(action) =
                        render_record_row(&mut row, i18n, columns, record, actions, with_actions)
                    {
                        response.action = Some(action);
                    }
                });
            }
        });

    response
}
