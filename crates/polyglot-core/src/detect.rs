//! Locale detection
//!
//! The detector tries an ordered list of sources and returns the first hit
//! that passes the supported-locale filter, caching the result. The engine
//! treats it as a black box producing `Option<Locale>`; resolution logic
//! never lives here.

use parking_lot::RwLock;
use polyglot_common::Locale;
use std::env;
use tracing::debug;

/// A single place a locale can be detected from
pub trait DetectionSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn detect(&self) -> Option<Locale>;
}

/// Reads the locale from process environment variables
///
/// Tries `LANGUAGE`, `LC_ALL`, `LC_MESSAGES`, then `LANG`, stripping codeset
/// suffixes (`en_US.UTF-8` → `en-us`). `C` and `POSIX` do not name a
/// language and are ignored.
#[derive(Debug, Default)]
pub struct EnvSource;

const ENV_VARS: [&str; 4] = ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"];

impl DetectionSource for EnvSource {
    fn name(&self) -> &'static str {
        "env"
    }

    fn detect(&self) -> Option<Locale> {
        ENV_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|raw| parse_env_locale(&raw))
    }
}

fn parse_env_locale(raw: &str) -> Option<Locale> {
    // LANGUAGE may hold a colon-separated priority list.
    let first = raw.split(':').next()?;
    let without_codeset = first.split('.').next()?.trim();
    if without_codeset.is_empty() || without_codeset == "C" || without_codeset == "POSIX" {
        return None;
    }
    Some(Locale::new(without_codeset))
}

/// Detects the startup locale from an ordered list of sources
pub struct LocaleDetector {
    sources: Vec<Box<dyn DetectionSource>>,
    supported_locales: RwLock<Vec<Locale>>,
    cached: RwLock<Option<Locale>>,
}

impl LocaleDetector {
    /// Create a detector with the default source order (environment only)
    pub fn new(supported_locales: Vec<Locale>) -> Self {
        Self::with_sources(vec![Box::new(EnvSource)], supported_locales)
    }

    /// Create a detector with custom sources, tried in order
    pub fn with_sources(
        sources: Vec<Box<dyn DetectionSource>>,
        supported_locales: Vec<Locale>,
    ) -> Self {
        Self {
            sources,
            supported_locales: RwLock::new(supported_locales),
            cached: RwLock::new(None),
        }
    }

    /// The first supported locale any source produces; cached once found
    pub fn detect(&self) -> Option<Locale> {
        if let Some(cached) = self.cached.read().clone() {
            return Some(cached);
        }

        for source in &self.sources {
            if let Some(locale) = source.detect() {
                if self.is_supported(&locale) {
                    *self.cached.write() = Some(locale.clone());
                    return Some(locale);
                }
                debug!(source = source.name(), %locale, "detected locale is not supported");
            }
        }
        None
    }

    /// Record an explicitly chosen locale, overriding future detection
    pub fn set_locale(&self, locale: Locale) {
        *self.cached.write() = Some(locale);
    }

    /// Forget the cached locale so the next `detect` consults sources again
    pub fn clear_cache(&self) {
        *self.cached.write() = None;
    }

    /// Replace the supported-locale filter; empty means everything passes
    pub fn set_supported_locales(&self, locales: Vec<Locale>) {
        *self.supported_locales.write() = locales;
    }

    fn is_supported(&self, locale: &Locale) -> bool {
        let supported = self.supported_locales.read();
        if supported.is_empty() {
            return true;
        }
        if supported.contains(locale) {
            return true;
        }
        // `pt-br` passes when `pt` is supported, and vice versa.
        supported
            .iter()
            .any(|candidate| candidate.base_language() == locale.base_language())
    }
}

impl std::fmt::Debug for LocaleDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("LocaleDetector")
            .field("sources", &names)
            .field("cached", &*self.cached.read())
            .finish()
    }
}
