use std::time::Duration;

use chrono::Utc;
use stockroom_business::{I18n, MessageKey, Notifications};
use stockroom_states::Time;

use crate::{state::State, widgets};

pub struct StockroomApp {
    state: State,
}

impl StockroomApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }
}

impl eframe::App for StockroomApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong("Stockroom");
                ui.separator();
                let i18n = self.state.ctx.state::<I18n>();
                ui.label(i18n.t(MessageKey::ProjectCodes).as_ref());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            show_settings(ui, &mut self.state);
        });

        // Keep polling while requests are in flight or toasts are on screen.
        let busy = self.state.ctx.task_count() > 0
            || !self.state.ctx.state::<Notifications>().visible().is_empty();
        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// One frame of the settings screen: sync background results, draw, then start new work.
pub fn show_settings(ui: &mut egui::Ui, state: &mut State) {
    // Sync Compute for render
    state.ctx.sync_computes();
    state.ctx.update::<Time>(|time| *time.as_mut() = Utc::now());

    widgets::drive_dialogs(&mut state.ctx, &mut state.dialogs);

    widgets::project_code_panel(ui, state);
    widgets::form_dialog(ui.ctx(), &mut state.ctx, &mut state.dialogs);
    widgets::notification_toasts(ui.ctx(), &mut state.ctx);

    // Run background jobs
    state.ctx.run_computed();
    state.ctx.flush_commands();
}
