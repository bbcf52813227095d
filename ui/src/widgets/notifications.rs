//! Toasts in the bottom-right corner.

use egui::{Align2, Color32, Frame, Id, Margin, RichText};
use stockroom_business::{
    I18n, Notifications,
    notifications::{NotificationLevel, NotificationText},
};
use stockroom_states::{StateCtx, Time};

const SUCCESS_COLOR: Color32 = Color32::from_rgb(34, 139, 34);

pub fn notification_toasts(egui_ctx: &egui::Context, ctx: &mut StateCtx) {
    let now = *ctx.state::<Time>().as_ref();
    ctx.update::<Notifications>(|notifications| notifications.poll(now));

    let i18n = ctx.state::<I18n>();
    let visible = ctx.state::<Notifications>().visible();
    if visible.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(Id::new("notifications"))
        .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(egui_ctx, |ui| {
            for (index, shown) in visible.iter().enumerate() {
                let text = match &shown.notification.text {
                    NotificationText::Key(key) => i18n.t(*key).into_owned(),
                    NotificationText::Raw(message) => message.clone(),
                };
                let color = match shown.notification.level {
                    NotificationLevel::Success => SUCCESS_COLOR,
                    NotificationLevel::Error => Color32::RED,
                };

                Frame::popup(ui.style())
                    .inner_margin(Margin::symmetric(10, 6))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(text).color(color));
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(index);
                            }
                        });
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(index) = dismissed {
        ctx.update::<Notifications>(|notifications| notifications.dismiss(index));
    }
}
