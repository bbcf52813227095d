use std::{any::Any, path::PathBuf};

use log::info;
use serde::Deserialize;
use stockroom_states::{State, state_assign_impl};
use ustr::Ustr;

/// Prefix shared by every environment variable the app reads.
pub const ENV_PREFIX: &str = "STOCKROOM_";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("invalid STOCKROOM_API_BASE_URL {0:?}: expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Server root, without the `/api` suffix.
    pub api_base_url: String,
    /// Sent as `Authorization: Token <value>` when present.
    pub api_token: Option<String>,
    pub locale: String,
    /// Grants every role check. The desktop build has no login flow.
    pub superuser: bool,
    /// JSON file with extra translations, `{ "<locale>": { "<message id>": "<text>" } }`.
    pub translations: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    api_token: Option<String>,
    locale: Option<String>,
    superuser: Option<bool>,
    translations: Option<String>,
}

impl BusinessConfig {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    pub const DEFAULT_LOCALE: &str = "en";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Build from `STOCKROOM_`-prefixed pairs; other keys are ignored.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let scoped = vars.into_iter().filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|rest| (rest.to_string(), value))
        });
        let raw: RawConfig =
            serde_env::from_iter(scoped).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let api_base_url = match raw.api_base_url {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => return Err(ConfigError::InvalidBaseUrl(url)),
            None => Self::DEFAULT_BASE_URL.to_string(),
        };

        let config = Self {
            api_base_url,
            api_token: raw.api_token.filter(|t| !t.trim().is_empty()),
            locale: raw
                .locale
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_LOCALE.to_string()),
            superuser: raw.superuser.unwrap_or(true),
            translations: raw.translations.map(PathBuf::from),
        };

        info!(
            "Loaded config: api_base_url={}, locale={}, superuser={}, token={}",
            config.api_base_url,
            config.locale,
            config.superuser,
            if config.api_token.is_some() { "set" } else { "unset" },
        );
        Ok(config)
    }

    pub fn api_url(&self) -> Ustr {
        let base = self.api_base_url.trim_end_matches('/');
        if base.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{base}/api"))
        }
    }

    pub fn authorization(&self) -> Option<String> {
        self.api_token.as_ref().map(|token| format!("Token {token}"))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_token: None,
            locale: Self::DEFAULT_LOCALE.to_string(),
            superuser: true,
            translations: None,
        }
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = BusinessConfig::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();
        assert_eq!(config, BusinessConfig::default());
        assert_eq!(config.api_url(), Ustr::from("http://localhost:8000/api"));
        assert_eq!(config.authorization(), None);
    }

    #[test]
    fn reads_prefixed_variables() {
        let config = BusinessConfig::from_vars(vars(&[
            ("STOCKROOM_API_BASE_URL", "https://inventree.example.com/"),
            ("STOCKROOM_API_TOKEN", "abc123"),
            ("STOCKROOM_LOCALE", "de"),
            ("STOCKROOM_SUPERUSER", "false"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://inventree.example.com");
        assert_eq!(
            config.api_url(),
            Ustr::from("https://inventree.example.com/api")
        );
        assert_eq!(config.authorization().as_deref(), Some("Token abc123"));
        assert_eq!(config.locale, "de");
        assert!(!config.superuser);
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = BusinessConfig::from_vars(vars(&[("STOCKROOM_API_BASE_URL", "localhost")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("localhost".to_string()));
    }

    #[test]
    fn empty_base_url_maps_to_relative_api() {
        assert_eq!(BusinessConfig::new("").api_url(), Ustr::from("/api"));
    }
}
