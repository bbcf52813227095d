//! Modal window for the API form that is currently open.

use egui::{Color32, Id, RichText, TextEdit, Window};
use stockroom_business::{
    BusinessConfig, FormDialogs, FormKind, FormRequestCompute, I18n, MessageKey,
    forms::{DialogPhase, dispatch_form_request},
};
use stockroom_states::StateCtx;

/// Feed the last request result to the dialogs and open the next queued form.
pub fn drive_dialogs(ctx: &mut StateCtx, dialogs: &mut FormDialogs) {
    if let Some(compute) = ctx.cached::<FormRequestCompute>() {
        dialogs.apply(&compute.status);
    }

    if let Some(load) = dialogs.poll(ctx.state::<BusinessConfig>()) {
        dispatch_form_request(ctx, load);
    }
}

/// Shows the open form, if any.
pub fn form_dialog(egui_ctx: &egui::Context, ctx: &mut StateCtx, dialogs: &mut FormDialogs) {
    let Some(dialog) = dialogs.active() else {
        return;
    };

    let i18n = ctx.state::<I18n>().clone();
    let id = dialog.id();
    let props = dialog.props().clone();
    let phase = dialog.phase();
    let errors = dialog.field_errors().clone();
    let cancellable = dialogs.can_cancel();

    let mut open = true;
    let mut submit = false;
    let mut cancel = false;

    let mut window = Window::new(i18n.t(props.title).as_ref())
        .id(Id::new(("api-form", id)))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0]);
    // No close button while a submit is in flight.
    if cancellable {
        window = window.open(&mut open);
    }
    window.show(egui_ctx, |ui| {
        if let Some(content) = props.pre_form_content {
            ui.label(i18n.t(content).as_ref());
            ui.add_space(8.0);
        }

        if phase == DialogPhase::Loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(i18n.t(MessageKey::Loading).as_ref());
            });
        } else if props.kind != FormKind::Delete {
            egui::Grid::new(("api-form-fields", id))
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for &name in props.fields.names() {
                        let label = props
                            .fields
                            .label(name)
                            .map(|key| i18n.t(key).into_owned())
                            .unwrap_or_else(|| name.to_string());
                        ui.label(label);

                        ui.vertical(|ui| {
                            match dialogs.field_mut(name) {
                                Some(value) => {
                                    ui.add(TextEdit::singleline(value).id_salt((id, name)));
                                }
                                None => {
                                    let mut shown = dialogs
                                        .active()
                                        .map(|d| d.value(name).to_string())
                                        .unwrap_or_default();
                                    ui.add_enabled(
                                        false,
                                        TextEdit::singleline(&mut shown).id_salt((id, name)),
                                    );
                                }
                            }
                            for message in errors.field(name) {
                                ui.colored_label(Color32::RED, message);
                            }
                        });
                        ui.end_row();
                    }
                });
        }

        for message in &errors.non_field {
            ui.colored_label(Color32::RED, message);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let editable = phase == DialogPhase::Editing;
            let submit_text = match props.kind {
                FormKind::Delete => i18n.t(MessageKey::Delete),
                FormKind::Create | FormKind::Edit => i18n.t(MessageKey::Submit),
            };
            if ui
                .add_enabled(editable, egui::Button::new(RichText::new(submit_text.as_ref())))
                .clicked()
            {
                submit = true;
            }
            let cancel_button = egui::Button::new(i18n.t(MessageKey::Cancel).as_ref());
            if ui.add_enabled(cancellable, cancel_button).clicked() {
                cancel = true;
            }
            if phase == DialogPhase::Submitting {
                ui.spinner();
            }
        });
    });

    if submit && let Some(request) = dialogs.submit(ctx.state::<BusinessConfig>()) {
        dispatch_form_request(ctx, request);
    } else if cancel || !open {
        dialogs.cancel();
    }
}
