//! Core domain types shared across the Polyglot workspace

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// A locale identifier such as `en` or `pt-BR`.
///
/// Locales are opaque strings, compared case-insensitively: the identifier is
/// normalized on construction (ASCII lowercase, `_` replaced by `-`), so
/// `Locale::from("pt_BR")` and `Locale::from("pt-br")` are equal and hash to
/// the same value. Any string is a valid locale; restricting to a supported
/// set is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Create a locale, normalizing the identifier.
    pub fn new(id: impl Into<String>) -> Self {
        let normalized = id.into().trim().to_ascii_lowercase().replace('_', "-");
        Self(normalized)
    }

    /// The normalized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base language: the segment before the first `-`.
    ///
    /// `pt-br` yields `pt`; a locale without a region yields itself.
    pub fn base_language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// The locale for the base language, e.g. `pt-br` → `pt`.
    pub fn base_locale(&self) -> Locale {
        Locale(self.base_language().to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Locale {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A node in a translation tree: either a leaf string or a nested subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationValue {
    /// A translated string.
    Leaf(String),
    /// A mapping from path segment to nested value.
    Tree(TranslationTree),
}

impl TranslationValue {
    /// The leaf string, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(s) => Some(s),
            Self::Tree(_) => None,
        }
    }

    /// The subtree, if this node is one.
    pub fn as_tree(&self) -> Option<&TranslationTree> {
        match self {
            Self::Leaf(_) => None,
            Self::Tree(t) => Some(t),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

impl From<&str> for TranslationValue {
    fn from(s: &str) -> Self {
        Self::Leaf(s.to_string())
    }
}

impl From<String> for TranslationValue {
    fn from(s: String) -> Self {
        Self::Leaf(s)
    }
}

impl From<TranslationTree> for TranslationValue {
    fn from(tree: TranslationTree) -> Self {
        Self::Tree(tree)
    }
}

/// A locale's translation tree. Leaves are strings; internal nodes map path
/// segments to subtrees or leaves.
pub type TranslationTree = BTreeMap<String, TranslationValue>;

/// All translations, keyed by locale.
pub type TranslationsMap = HashMap<Locale, TranslationTree>;
