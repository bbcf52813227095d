mod data_table;
mod forms;
mod notifications;
mod project_codes;

pub use data_table::{DataTableResponse, data_table};
pub use forms::{drive_dialogs, form_dialog};
pub use notifications::notification_toasts;
pub use project_codes::project_code_panel;
