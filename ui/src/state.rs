use stockroom_business::{
    BusinessConfig, FormDialogs, ModalFormHost, Notifications, Notifier, ProjectCodeTable,
    build_state_ctx, dialog_channel, notification_channel,
};
use stockroom_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    pub project_codes: ProjectCodeTable,
    /// Handed to form flows; dialogs it requests show up in `dialogs`.
    pub form_host: ModalFormHost,
    pub dialogs: FormDialogs,
    pub notifier: Notifier,
}

impl State {
    pub fn new(config: BusinessConfig) -> Self {
        let mut ctx = build_state_ctx(config);

        let (notifier, notifications) = notification_channel();
        ctx.add_state(Notifications::new(notifications));

        let (form_host, requests) = dialog_channel();

        Self {
            ctx,
            project_codes: ProjectCodeTable::default(),
            form_host,
            dialogs: FormDialogs::new(requests, notifier.clone()),
            notifier,
        }
    }

    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url))
    }
}
