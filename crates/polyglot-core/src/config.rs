//! Translator configuration

use crate::interpolate::InterpolationConfig;
use crate::options::TranslateOptions;
use crate::plural::PluralizationConfig;
use polyglot_common::{Locale, TranslationsMap};
use serde::Deserialize;
use std::sync::Arc;

/// Called during resolution when a key resolves nowhere; its return value is
/// handed back to the caller as the final string.
pub type MissingTranslationHandler =
    Arc<dyn Fn(&str, &Locale, &TranslateOptions) -> String + Send + Sync>;

/// Configuration for [`Translator`](crate::Translator)
///
/// Deserializable from a JSON document for everything except plural rules and
/// the missing-translation handler, which are code.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Locale of last resort in the fallback chain
    pub default_locale: Locale,
    /// Starting locale; defaults to `default_locale`
    pub current_locale: Option<Locale>,
    /// Restricts what locale detection may produce; empty means unrestricted
    pub supported_locales: Vec<Locale>,
    /// Initial translations snapshot
    pub translations: TranslationsMap,
    /// Detect the starting locale from the environment at construction.
    ///
    /// Off by default: a library embedded in an arbitrary process should not
    /// read `LANG` unless asked to.
    pub detect_locale: bool,
    /// Locales tried, in order, after the requested locale yields nothing
    pub fallback_locales: Vec<Locale>,
    /// Emit diagnostics for missing keys and exhausted loaders
    pub debug: bool,
    /// Interpolation delimiters and escaping
    pub interpolation: InterpolationConfig,
    /// Plural-rule overrides merged over the built-in table
    #[serde(skip)]
    pub pluralization: PluralizationConfig,
    /// Missing-translation policy; when set, its result replaces the
    /// default-value/bare-key behavior
    #[serde(skip)]
    pub on_missing_translation: Option<MissingTranslationHandler>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::new("en"),
            current_locale: None,
            supported_locales: Vec::new(),
            translations: TranslationsMap::new(),
            detect_locale: false,
            fallback_locales: Vec::new(),
            debug: false,
            interpolation: InterpolationConfig::default(),
            pluralization: PluralizationConfig::default(),
            on_missing_translation: None,
        }
    }
}

impl TranslatorConfig {
    /// Configuration with the given default locale and defaults for the rest
    pub fn new(default_locale: impl Into<Locale>) -> Self {
        Self {
            default_locale: default_locale.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("default_locale", &self.default_locale)
            .field("current_locale", &self.current_locale)
            .field("supported_locales", &self.supported_locales)
            .field("detect_locale", &self.detect_locale)
            .field("fallback_locales", &self.fallback_locales)
            .field("debug", &self.debug)
            .field("interpolation", &self.interpolation)
            .field("pluralization", &self.pluralization)
            .field(
                "on_missing_translation",
                &self.on_missing_translation.as_ref().map(|_| "<handler>"),
            )
            .finish()
    }
}
