//! Shared types and infrastructure for the Polyglot translation engine
//!
//! This crate provides the domain types used across the workspace:
//!
//! - [`Locale`]: a case-insensitive locale identifier
//! - [`TranslationValue`] and [`TranslationTree`]: the nested translation
//!   data model
//! - Structured logging bootstrap built on `tracing`

pub mod logging;
pub mod types;

pub use logging::{init_logging, LoggingConfig};
pub use types::{Locale, TranslationTree, TranslationValue, TranslationsMap};
