//! Project code REST calls.

use crate::{
    BusinessConfig,
    api_paths::{ApiPaths, api_url},
    error::{ApiError, ApiResult, check_status},
    http::Client,
    table::ListQuery,
};

use super::model::{ProjectCode, ProjectCodeListResponse};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCodePage {
    pub records: Vec<ProjectCode>,
    pub count: u64,
}

/// GET `/api/project-code/`
pub async fn list_project_codes(
    config: &BusinessConfig,
    query: &ListQuery,
) -> ApiResult<ProjectCodePage> {
    let url = api_url(config, ApiPaths::ProjectCodeList, None);

    let response = Client::get(&url)
        .header("accept", "application/json")
        .header_opt("authorization", config.authorization())
        .query(query.params())
        .send()
        .await?;
    check_status(&response, &[200])?;

    let list: ProjectCodeListResponse = response.json().map_err(|e| ApiError::Decode {
        what: "project code list",
        message: e.to_string(),
    })?;
    let (records, count) = list.into_parts();
    Ok(ProjectCodePage { records, count })
}
