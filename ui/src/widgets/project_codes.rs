//! Project code settings panel: toolbar, list and the form flows behind its buttons.

use std::time::Duration;

use egui::{Color32, TextEdit, Ui};
use log::error;
use stockroom_business::{
    I18n, MessageKey, Pk, ProjectCodeListCompute, ProjectCodeTableState, UserRoles,
    project_codes::request_refresh_if_stale,
    table::{RowAction, RowActionKind, TableActionKind, toggle_sort},
};

use super::data_table::data_table;
use crate::state::State;

/// Form flow started from the panel.
#[derive(Debug, Clone, Copy)]
enum FormFlow {
    Add,
    Edit(Pk),
    Delete(Pk),
}

impl From<RowAction> for FormFlow {
    fn from(action: RowAction) -> Self {
        match action.kind {
            RowActionKind::Edit => Self::Edit(action.pk),
            RowActionKind::Delete => Self::Delete(action.pk),
        }
    }
}

pub fn project_code_panel(ui: &mut Ui, state: &mut State) {
    let i18n = state.ctx.state::<I18n>().clone();
    let roles = state.ctx.state::<UserRoles>().clone();
    let controller = state.project_codes.controller().clone();

    let mut flow = None;

    ui.vertical(|ui| {
        ui.heading(i18n.t(MessageKey::ProjectCodes).as_ref());
        ui.add_space(4.0);

        // Toolbar
        ui.horizontal(|ui| {
            for action in state.project_codes.table_actions(&roles) {
                match action.kind {
                    TableActionKind::Add => {
                        if ui
                            .button(format!("➕ {}", i18n.t(MessageKey::AddProjectCode)))
                            .on_hover_text(i18n.t(action.tooltip).as_ref())
                            .clicked()
                        {
                            flow = Some(FormFlow::Add);
                        }
                    }
                }
            }

            let mut search = state.ctx.state::<ProjectCodeTableState>().search.clone();
            let edit = ui.add(
                TextEdit::singleline(&mut search)
                    .hint_text(i18n.t(MessageKey::Search).as_ref())
                    .desired_width(180.0),
            );
            if edit.changed() {
                state
                    .ctx
                    .update::<ProjectCodeTableState>(|view| view.search = search);
                controller.refresh();
            }

            if ui.button(i18n.t(MessageKey::Refresh).as_ref()).clicked() {
                controller.refresh();
            }
        });

        request_refresh_if_stale(&mut state.ctx, &controller);

        ui.add_space(8.0);

        let sort = state.ctx.state::<ProjectCodeTableState>().sort;
        let Some(list) = state.ctx.cached::<ProjectCodeListCompute>() else {
            return;
        };

        if list.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(i18n.t(MessageKey::Loading).as_ref());
            });
        }
        if let Some(message) = list.error_message() {
            ui.colored_label(Color32::RED, format!("Error: {message}"));
        }

        let Some(records) = list.records() else {
            return;
        };
        if records.is_empty() {
            ui.label(i18n.t(MessageKey::NoRecordsFound).as_ref());
            return;
        }

        let table = &state.project_codes;
        let columns = table.columns();
        let clicked = data_table(
            ui,
            controller.key().to_string(),
            &i18n,
            &columns,
            sort,
            records,
            |record| table.row_actions(record, &roles),
        );

        if let Some(action) = clicked.action {
            flow = Some(action.into());
        }
        if let Some(accessor) = clicked.sort_clicked {
            let next = toggle_sort(&columns, sort, accessor);
            state
                .ctx
                .update::<ProjectCodeTableState>(|view| view.sort = next);
            controller.refresh();
        }
    });

    if let Some(flow) = flow {
        start_form_flow(ui.ctx(), state, flow);
    }
}

/// Run a form flow on the tokio runtime; it resolves once the user closes the dialog.
fn start_form_flow(egui_ctx: &egui::Context, state: &State, flow: FormFlow) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        error!("No tokio runtime available to run {flow:?}");
        return;
    };

    let table = state.project_codes.clone();
    let host = state.form_host.clone();
    let notifier = state.notifier.clone();
    let repaint = egui_ctx.clone();

    handle.spawn(async move {
        match flow {
            FormFlow::Add => {
                table.add(&host, &notifier).await;
            }
            FormFlow::Edit(pk) => {
                table.edit(&host, &notifier, pk).await;
            }
            FormFlow::Delete(pk) => {
                table.delete(&host, &notifier, pk).await;
            }
        }
        repaint.request_repaint();
    });

    // The dialog request arrives from the spawned task.
    egui_ctx.request_repaint_after(Duration::from_millis(50));
}
