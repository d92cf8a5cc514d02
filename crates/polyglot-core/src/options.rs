//! Per-call translation options

use polyglot_common::Locale;
use std::collections::HashMap;

/// Options for a single translation request
///
/// Built fluently in the style of a request context:
///
/// ```rust
/// use polyglot_core::TranslateOptions;
///
/// let options = TranslateOptions::with_count(3)
///     .add_value("name", "Ana")
///     .set_default_value("missing");
/// assert_eq!(options.count, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Interpolation values, substituted into `{{placeholder}}` slots
    pub values: HashMap<String, String>,
    /// Count for plural resolution
    pub count: Option<i64>,
    /// Locale override for this request; defaults to the engine's current locale
    pub locale: Option<Locale>,
    /// Returned (formatted) when the key resolves nowhere and no handler is set
    pub default_value: Option<String>,
    /// Free-form disambiguation context, passed through to missing handlers
    pub context: Option<String>,
}

impl TranslateOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options with a count for pluralization
    pub fn with_count(count: i64) -> Self {
        Self {
            count: Some(count),
            ..Default::default()
        }
    }

    /// Create options targeting a specific locale
    pub fn with_locale(locale: impl Into<Locale>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..Default::default()
        }
    }

    /// Set the count
    pub fn set_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the locale override
    pub fn set_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the default value used when the key cannot be resolved
    pub fn set_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the disambiguation context
    pub fn set_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add an interpolation value
    pub fn add_value<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
        self
    }
}
