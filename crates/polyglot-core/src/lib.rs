//! Translation resolution engine for Polyglot
//!
//! This crate resolves symbolic translation keys plus runtime parameters
//! (locale, count, interpolation values) into display strings. It includes:
//!
//! - Locale-scoped nested key/value storage with dotted-path access
//! - Fallback-chain resolution with a configurable missing-key policy
//! - Pluralization via per-locale rule functions and suffixed key variants
//! - Interpolation with configurable delimiters
//! - Asynchronous, deduplicated translation loading with multi-loader fallback
//! - Typed lifecycle events
//!
//! # Example
//!
//! ```rust
//! use polyglot_core::{TranslateOptions, Translator, TranslatorConfig};
//!
//! let translator = Translator::new(TranslatorConfig::new("en"));
//! translator.add_translations(
//!     "en",
//!     serde_json::from_value(serde_json::json!({
//!         "greet": "Hello {{name}}"
//!     }))
//!     .unwrap(),
//! );
//!
//! let greeting = translator.translate("greet", &TranslateOptions::new().add_value("name", "Ana"));
//! assert_eq!(greeting, "Hello Ana");
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod events;
pub mod formatter;
pub mod interpolate;
pub mod loader;
pub mod options;
pub mod plural;
pub mod store;
pub mod translator;

pub use config::{MissingTranslationHandler, TranslatorConfig};
pub use detect::{DetectionSource, EnvSource, LocaleDetector};
pub use error::{TranslationError, TranslationResult};
pub use events::{EventBus, EventKind, Subscription, TranslatorEvent};
pub use formatter::{Formatter, FormatterPipeline};
pub use interpolate::{InterpolationConfig, InterpolationFormatter};
pub use loader::{CachedLoader, CompositeLoader, TranslationLoader};
pub use options::TranslateOptions;
pub use plural::{
    plural_key_variants, strip_plural_suffix, PluralFormatter, PluralRule, PluralizationConfig,
    PLURAL_SUFFIXES,
};
pub use store::TranslationStore;
pub use translator::Translator;

// Re-export the shared domain types
pub use polyglot_common::{Locale, TranslationTree, TranslationValue, TranslationsMap};
