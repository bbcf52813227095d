use serde::{Deserialize, Serialize};

use crate::{api_paths::Pk, table::TableRecord};

pub const FIELD_CODE: &str = "code";
pub const FIELD_DESCRIPTION: &str = "description";

/// A short code tagging orders and stock with a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCode {
    pub pk: Pk,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl TableRecord for ProjectCode {
    fn pk(&self) -> Pk {
        self.pk
    }

    fn cell(&self, accessor: &str) -> Option<&str> {
        match accessor {
            FIELD_CODE => Some(&self.code),
            FIELD_DESCRIPTION => Some(&self.description),
            _ => None,
        }
    }
}

/// The list endpoint answers with a bare array, or a page when `limit` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProjectCodeListResponse {
    Page {
        count: u64,
        results: Vec<ProjectCode>,
    },
    Plain(Vec<ProjectCode>),
}

impl ProjectCodeListResponse {
    /// Records plus the total count on the server.
    pub fn into_parts(self) -> (Vec<ProjectCode>, u64) {
        match self {
            Self::Page { count, results } => (results, count),
            Self::Plain(records) => {
                let count = records.len() as u64;
                (records, count)
            }
        }
    }
}
