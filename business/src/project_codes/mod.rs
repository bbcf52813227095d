mod api;
mod list_compute;
mod model;
mod table;

pub use api::{ProjectCodePage, list_project_codes};
pub use list_compute::{
    ProjectCodeListCompute, ProjectCodeListInput, ProjectCodeListResult, ProjectCodeTableState,
    RefreshProjectCodesCommand, request_refresh_if_stale,
};
pub use model::{FIELD_CODE, FIELD_DESCRIPTION, ProjectCode, ProjectCodeListResponse};
pub use table::{PROJECT_CODE_RULESET, PROJECT_CODE_TABLE, ProjectCodeTable};
