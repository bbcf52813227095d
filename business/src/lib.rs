//! Business layer for the Stockroom settings screens.
//!
//! Holds the states, computes and commands the UI reads and dispatches. Network IO only
//! happens inside commands.

pub mod api_paths;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod i18n;
pub mod notifications;
pub mod project_codes;
pub mod roles;
pub mod table;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use log::warn;
use stockroom_states::{StateCtx, Time};

pub use api_paths::{ApiPaths, Pk};
pub use config::{BusinessConfig, ConfigError};
pub use error::{ApiError, ApiResult, FieldErrors};
pub use forms::{
    ApiFormProps, FieldSet, FormDialogs, FormError, FormHost, FormKind, FormOutcome,
    FormRequestCompute, FormRequestInput, ModalFormHost, SendFormRequestCommand, dialog_channel,
};
pub use i18n::{Catalog, I18n, MessageKey, Translate};
pub use notifications::{Notifications, Notifier, notification_channel};
pub use project_codes::{
    ProjectCode, ProjectCodeListCompute, ProjectCodeListInput, ProjectCodeTable,
    ProjectCodeTableState, RefreshProjectCodesCommand,
};
pub use roles::{GroupRoles, UserRoles};
pub use table::{TableController, TableKey};

/// Translator for `config.locale`, with the optional translations file merged in.
///
/// A missing or broken file is logged and the English text is used.
pub fn build_i18n(config: &BusinessConfig) -> I18n {
    let mut catalog = Catalog::new();
    if let Some(path) = &config.translations
        && let Err(err) = catalog.load_file(path)
    {
        warn!("Ignoring translations: {err}");
    }
    I18n::new(Arc::new(catalog), config.locale.clone())
}

/// Register every state, compute and command of the business layer.
pub fn build_state_ctx(config: BusinessConfig) -> StateCtx {
    let mut ctx = StateCtx::new();

    ctx.add_state(Time::default());
    ctx.add_state(build_i18n(&config));
    ctx.add_state(if config.superuser {
        UserRoles::superuser()
    } else {
        UserRoles::with_groups(vec![GroupRoles::new("default")])
    });
    ctx.add_state(config);

    // Project code list
    ctx.add_state(ProjectCodeTableState::default());
    ctx.add_state(ProjectCodeListInput::default());
    ctx.record_compute(ProjectCodeListCompute::default());

    // Form dialogs
    ctx.add_state(FormRequestInput::default());
    ctx.record_compute(FormRequestCompute::default());

    ctx.record_command(RefreshProjectCodesCommand);
    ctx.record_command(SendFormRequestCommand);

    ctx
}

/// Flush queued commands and wait until every spawned task finished.
pub async fn flush_and_await(ctx: &mut StateCtx) {
    ctx.sync_computes();
    ctx.flush_commands();
    while ctx.task_count() > 0 {
        if ctx.task_set_mut().join_next().await.is_some() {
            ctx.sync_computes();
        }
    }
    ctx.sync_computes();
}
