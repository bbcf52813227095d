//! Table header with clickable sort indicators.

use egui::{Button, RichText, Ui};
use egui_extras::TableRow;
use stockroom_business::{
    I18n, MessageKey,
    table::{SortDirection, TableColumn, TableSort},
};

/// Renders the header row. Returns the accessor of a clicked sortable column.
#[inline]
pub fn render_table_header(
    header: &mut TableRow<'_, '_>,
    i18n: &I18n,
    columns: &[TableColumn],
    sort: Option<TableSort>,
    with_actions: bool,
) -> Option<&'static str> {
    let mut clicked = None;

    for column in columns {
        header.col(|ui| {
            let title = column
                .title
                .map(|key| i18n.t(key).into_owned())
                .unwrap_or_else(|| column.accessor.to_string());
            if column.sortable {
                let indicator = match sort {
                    Some(s) if s.accessor == column.accessor => sort_indicator(s.direction),
                    _ => "",
                };
                if render_sortable_cell(ui, &title, indicator) {
                    clicked = Some(column.accessor);
                }
            } else {
                render_header_cell(ui, &title);
            }
        });
    }

    if with_actions {
        header.col(|ui| render_header_cell(ui, &i18n.t(MessageKey::Actions)));
    }

    clicked
}

fn sort_indicator(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => " ⏶",
        SortDirection::Descending => " ⏷",
    }
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.centered_and_justified(|ui| {
        ui.strong(label);
    });
}

#[inline]
fn render_sortable_cell(ui: &mut Ui, label: &str, indicator: &str) -> bool {
    ui.centered_and_justified(|ui| {
        ui.add(Button::new(RichText::new(format!("{label}{indicator}")).strong()).frame(false))
            .on_hover_text("Sort")
            .clicked()
    })
    .inner
}
