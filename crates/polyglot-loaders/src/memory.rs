//! In-memory translation loader

use async_trait::async_trait;
use polyglot_common::{Locale, TranslationTree, TranslationsMap};
use polyglot_core::{TranslationError, TranslationLoader, TranslationResult};
use std::collections::HashMap;

/// Serves translation trees registered in code
///
/// Useful as a seed source in tests and demos, or as the last entry of a
/// composite chain so a handful of bundled locales always resolve.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    translations: HashMap<Locale, TranslationTree>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tree for a locale (builder style)
    pub fn with_translations(mut self, locale: impl Into<Locale>, tree: TranslationTree) -> Self {
        self.translations.insert(locale.into(), tree);
        self
    }

    /// Register trees for several locales at once
    pub fn with_many(mut self, translations: TranslationsMap) -> Self {
        self.translations.extend(translations);
        self
    }
}

#[async_trait]
impl TranslationLoader for MemoryLoader {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree> {
        self.translations
            .get(locale)
            .cloned()
            .ok_or_else(|| TranslationError::LoaderFailed {
                loader: "memory".to_string(),
                locale: locale.clone(),
                message: "no translations registered for locale".to_string(),
            })
    }

    fn supports(&self, locale: &Locale) -> bool {
        self.translations.contains_key(locale)
    }
}
