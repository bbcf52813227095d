//! REST endpoint catalogue.

use serde::{Deserialize, Serialize};

use crate::BusinessConfig;

/// Primary key of a server-side record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pk(pub u64);

impl std::fmt::Display for Pk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Pk {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiPaths {
    ProjectCodeList,
}

impl ApiPaths {
    /// Path below `/api`, with leading and trailing slash.
    pub fn path(self) -> &'static str {
        match self {
            Self::ProjectCodeList => "/project-code/",
        }
    }
}

/// Absolute URL of a list endpoint, or of one record when `pk` is given.
pub fn api_url(config: &BusinessConfig, path: ApiPaths, pk: Option<Pk>) -> String {
    let base = config.api_url();
    match pk {
        Some(pk) => format!("{base}{}{pk}/", path.path()),
        None => format!("{base}{}", path.path()),
    }
}
