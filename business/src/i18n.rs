//! Translatable UI strings.
//!
//! Every user-visible string is a [`MessageKey`]. Its English source text is compiled in;
//! other locales come from a [`Catalog`] loaded at startup. Lookups never fail: a missing
//! translation falls back to the English text.

use std::{any::Any, borrow::Cow, collections::HashMap, path::Path, sync::Arc};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use stockroom_states::{State, state_assign_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    ProjectCodes,
    ProjectCode,
    Description,
    AddProjectCode,
    AddedProjectCode,
    EditProjectCode,
    ProjectCodeUpdated,
    DeleteProjectCode,
    ProjectCodeDeleted,
    ConfirmRemoveProjectCode,
    Actions,
    Edit,
    Delete,
    Submit,
    Cancel,
    Loading,
    Search,
    NoRecordsFound,
    Refresh,
}

impl MessageKey {
    pub const ALL: &[MessageKey] = &[
        Self::ProjectCodes,
        Self::ProjectCode,
        Self::Description,
        Self::AddProjectCode,
        Self::AddedProjectCode,
        Self::EditProjectCode,
        Self::ProjectCodeUpdated,
        Self::DeleteProjectCode,
        Self::ProjectCodeDeleted,
        Self::ConfirmRemoveProjectCode,
        Self::Actions,
        Self::Edit,
        Self::Delete,
        Self::Submit,
        Self::Cancel,
        Self::Loading,
        Self::Search,
        Self::NoRecordsFound,
        Self::Refresh,
    ];

    /// English source text.
    pub fn source_text(self) -> &'static str {
        match self {
            Self::ProjectCodes => "Project Codes",
            Self::ProjectCode => "Project Code",
            Self::Description => "Description",
            Self::AddProjectCode => "Add project code",
            Self::AddedProjectCode => "Added project code",
            Self::EditProjectCode => "Edit project code",
            Self::ProjectCodeUpdated => "Project code updated",
            Self::DeleteProjectCode => "Delete project code",
            Self::ProjectCodeDeleted => "Project code deleted",
            Self::ConfirmRemoveProjectCode => {
                "Are you sure you want to remove this project code?"
            }
            Self::Actions => "Actions",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Submit => "Submit",
            Self::Cancel => "Cancel",
            Self::Loading => "Loading...",
            Self::Search => "Search",
            Self::NoRecordsFound => "No records found",
            Self::Refresh => "Refresh",
        }
    }
}

/// Locale-aware lookup of message text.
pub trait Translate: Send + Sync {
    fn translate(&self, key: MessageKey, locale: &str) -> Cow<'_, str>;
}

/// Returns the English source text for every locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceText;

impl Translate for SourceText {
    fn translate(&self, key: MessageKey, _locale: &str) -> Cow<'_, str> {
        Cow::Borrowed(key.source_text())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read translations from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid translations JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Translations per locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locales: HashMap<String, HashMap<MessageKey, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, key: MessageKey, text: impl Into<String>) {
        self.locales
            .entry(normalize_locale(locale))
            .or_default()
            .insert(key, text.into());
    }

    /// Merge `{ "<locale>": { "<message id>": "<text>" } }`.
    pub fn load_json(&mut self, json: &str) -> Result<(), CatalogError> {
        let parsed: HashMap<String, HashMap<MessageKey, String>> = serde_json::from_str(json)?;
        for (locale, entries) in parsed {
            debug!("Loaded {} messages for locale {locale}", entries.len());
            self.locales
                .entry(normalize_locale(&locale))
                .or_default()
                .extend(entries);
        }
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_json(&json)?;
        info!("Loaded translations from {}", path.display());
        Ok(())
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    fn lookup(&self, key: MessageKey, locale: &str) -> Option<&str> {
        let locale = normalize_locale(locale);
        let exact = self.locales.get(&locale).and_then(|m| m.get(&key));
        let language = || {
            let (lang, _) = locale.split_once('-')?;
            self.locales.get(lang)?.get(&key)
        };
        exact.or_else(language).map(String::as_str)
    }
}

impl Translate for Catalog {
    fn translate(&self, key: MessageKey, locale: &str) -> Cow<'_, str> {
        match self.lookup(key, locale) {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Borrowed(key.source_text()),
        }
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_lowercase()
}

/// Active translator and locale, shared with the UI.
#[derive(Clone)]
pub struct I18n {
    translator: Arc<dyn Translate>,
    locale: String,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n").field("locale", &self.locale).finish()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(Arc::new(SourceText), "en")
    }
}

impl I18n {
    pub fn new(translator: Arc<dyn Translate>, locale: impl Into<String>) -> Self {
        Self {
            translator,
            locale: locale.into(),
        }
    }

    pub fn t(&self, key: MessageKey) -> Cow<'_, str> {
        self.translator.translate(key, &self.locale)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }
}

impl State for I18n {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_source_text() {
        for key in MessageKey::ALL {
            assert!(!key.source_text().is_empty(), "{key:?}");
        }
    }

    #[test]
    fn source_text_matches_table_strings() {
        assert_eq!(MessageKey::ProjectCode.source_text(), "Project Code");
        assert_eq!(
            MessageKey::ConfirmRemoveProjectCode.source_text(),
            "Are you sure you want to remove this project code?"
        );
        assert_eq!(MessageKey::AddedProjectCode.source_text(), "Added project code");
    }

    #[test]
    fn catalog_falls_back_to_language_then_english() {
        let mut catalog = Catalog::new();
        catalog
            .load_json(r#"{"de": {"project_code": "Projektcode", "description": "Beschreibung"}}"#)
            .unwrap();
        catalog.insert("de_AT", MessageKey::Description, "Bezeichnung");

        assert_eq!(catalog.translate(MessageKey::ProjectCode, "de"), "Projektcode");
        assert_eq!(
            catalog.translate(MessageKey::ProjectCode, "de-AT"),
            "Projektcode"
        );
        assert_eq!(
            catalog.translate(MessageKey::Description, "de-at"),
            "Bezeichnung"
        );
        assert_eq!(catalog.translate(MessageKey::Refresh, "de"), "Refresh");
        assert_eq!(
            catalog.translate(MessageKey::ProjectCode, "fr"),
            "Project Code"
        );
    }

    #[test]
    fn catalog_rejects_unknown_message_ids() {
        let mut catalog = Catalog::new();
        let err = catalog.load_json(r#"{"de": {"no_such_message": "x"}}"#);
        assert!(matches!(err, Err(CatalogError::Json(_))));
    }

    #[test]
    fn i18n_switches_locale() {
        let mut catalog = Catalog::new();
        catalog.insert("de", MessageKey::Edit, "Bearbeiten");
        let mut i18n = I18n::new(Arc::new(catalog), "en");

        assert_eq!(i18n.t(MessageKey::Edit), "Edit");
        i18n.set_locale("de");
        assert_eq!(i18n.t(MessageKey::Edit), "Bearbeiten");
    }
}
