//! Error types for translation operations
//!
//! A missing key or locale is not an error: resolution handles absence through
//! the fallback chain and missing-translation policy, and `translate` always
//! returns a string. The variants here cover the load path and configuration.

use polyglot_common::Locale;
use thiserror::Error;

/// Errors that can occur while loading or configuring translations
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A loader failed or returned malformed data
    #[error("loader '{loader}' failed for locale '{locale}': {message}")]
    LoaderFailed {
        loader: String,
        locale: Locale,
        message: String,
    },

    /// Every registered loader was tried and none could serve the locale
    #[error("no loader could provide translations for locale '{locale}'")]
    AllLoadersExhausted { locale: Locale },

    /// A remote fetch exceeded its deadline
    #[error("timed out after {seconds}s loading translations for locale '{locale}'")]
    Timeout { locale: Locale, seconds: u64 },

    /// Invalid engine or loader configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// IO error while reading translation data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A translation document could not be parsed
    #[error("malformed translation document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for translation operations
pub type TranslationResult<T> = Result<T, TranslationError>;
