//! Row rendering for the settings tables.

use egui::{Stroke, Ui};
use egui_extras::TableRow;
use stockroom_business::{
    I18n,
    table::{RowAction, TableColumn, TableRecord},
};

/// Renders one record. Returns the action whose button was clicked.
#[inline]
pub fn render_record_row<R: TableRecord>(
    row: &mut TableRow<'_, '_>,
    i18n: &I18n,
    columns: &[TableColumn],
    record: &R,
    actions: &[RowAction],
    with_actions: bool,
) -> Option<RowAction> {
    for column in columns {
        row.col(|ui| {
            ui.centered_and_justified(|ui| {
                ui.label(record.cell(column.accessor).unwrap_or_default());
            });
            draw_cell_bottom_border(ui);
        });
    }

    let mut clicked = None;
    if with_actions {
        row.col(|ui| {
            ui.horizontal_centered(|ui| {
                for action in actions {
                    if ui.button(i18n.t(action.title()).as_ref()).clicked() {
                        clicked = Some(*action);
                    }
                }
            });
            draw_cell_bottom_border(ui);
        });
    }
    clicked
}

/// Draws a bottom border line for a cell.
#[inline]
fn draw_cell_bottom_border(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let border_color = ui.visuals().widgets.noninteractive.bg_stroke.color;
    ui.painter().hline(
        rect.left()..=rect.right(),
        rect.bottom(),
        Stroke::new(1.0, border_color),
    );
}
