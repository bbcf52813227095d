//! Column widths for the settings tables.

use egui_extras::Column;

pub const ACTIONS_WIDTH: f32 = 140.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// One flexible column per data column, plus a fixed actions column when rows have actions.
#[inline]
pub fn table_columns(data_columns: usize, with_actions: bool) -> Vec<Column> {
    let mut columns: Vec<Column> = (0..data_columns)
        .map(|_| Column::remainder().at_least(100.0).clip(true))
        .collect();
    if with_actions {
        columns.push(Column::exact(ACTIONS_WIDTH));
    }
    columns
}
