//! Locale-scoped translation storage
//!
//! The store owns the full translations map. Trees handed out to callers are
//! always clones, so external code can never mutate store-internal state
//! through a returned reference.

use polyglot_common::{Locale, TranslationTree, TranslationValue, TranslationsMap};
use tracing::debug;

/// Nested key/value storage for translations, scoped by locale
///
/// Keys are dot-delimited paths (`"errors.notFound"`). A path segment can hold
/// either a leaf or a subtree at any time; writing through an existing leaf
/// replaces it with a subtree and the old value is discarded (last write wins
/// on type conflict).
#[derive(Debug, Default)]
pub struct TranslationStore {
    translations: TranslationsMap,
}

impl TranslationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an initial snapshot
    pub fn with_translations(translations: TranslationsMap) -> Self {
        Self { translations }
    }

    /// Resolve a dotted key to a leaf value in the given locale
    ///
    /// Returns `None` if any intermediate segment is missing or a leaf, or if
    /// the final node is a subtree rather than a leaf.
    pub fn get(&self, locale: &Locale, key: &str) -> Option<&str> {
        resolve_nested(self.translations.get(locale)?, key)
    }

    /// Whether the key resolves to a leaf in the given locale
    pub fn has(&self, locale: &Locale, key: &str) -> bool {
        self.get(locale, key).is_some()
    }

    /// Whether any translations exist for the given locale
    pub fn has_locale(&self, locale: &Locale) -> bool {
        self.translations.contains_key(locale)
    }

    /// A clone of the locale's translation tree
    pub fn get_locale(&self, locale: &Locale) -> Option<TranslationTree> {
        self.translations.get(locale).cloned()
    }

    /// All locales with translations present
    pub fn available_locales(&self) -> Vec<Locale> {
        self.translations.keys().cloned().collect()
    }

    /// Replace the locale's tree wholesale
    pub fn replace_locale(&mut self, locale: &Locale, translations: TranslationTree) {
        self.translations.insert(locale.clone(), translations);
    }

    /// Deep-merge a tree into the locale's existing tree
    ///
    /// Subtrees on both sides merge recursively; otherwise the incoming value
    /// replaces the existing one.
    pub fn merge_locale(&mut self, locale: &Locale, translations: TranslationTree) {
        let target = self.translations.entry(locale.clone()).or_default();
        deep_merge(target, translations);
    }

    /// Set a single leaf value, creating intermediate subtrees as needed
    pub fn set(&mut self, locale: &Locale, key: &str, value: impl Into<String>) {
        let target = self.translations.entry(locale.clone()).or_default();
        set_nested(target, key, value.into());
    }

    /// Remove the node at the dotted key; returns whether anything was removed
    pub fn remove(&mut self, locale: &Locale, key: &str) -> bool {
        match self.translations.get_mut(locale) {
            Some(tree) => remove_nested(tree, key),
            None => false,
        }
    }

    /// Remove all translations for a locale
    pub fn remove_locale(&mut self, locale: &Locale) -> bool {
        let removed = self.translations.remove(locale).is_some();
        if removed {
            debug!(%locale, "removed locale from store");
        }
        removed
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.translations.clear();
    }

    /// Number of leaf values stored for the locale
    pub fn count(&self, locale: &Locale) -> usize {
        self.translations.get(locale).map_or(0, count_leaves)
    }

    /// A full snapshot of all translations
    pub fn export(&self) -> TranslationsMap {
        self.translations.clone()
    }

    /// Replace (or, with `merge`, deep-merge per locale) the full map
    pub fn import(&mut self, translations: TranslationsMap, merge: bool) {
        if merge {
            for (locale, tree) in translations {
                self.merge_locale(&locale, tree);
            }
        } else {
            self.translations = translations;
        }
    }
}

fn resolve_nested<'a>(mut tree: &'a TranslationTree, key: &str) -> Option<&'a str> {
    let mut segments = key.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = tree.get(segment)?;
        if segments.peek().is_none() {
            return value.as_leaf();
        }
        tree = value.as_tree()?;
    }
    None
}

fn set_nested(tree: &mut TranslationTree, key: &str, value: String) {
    match key.split_once('.') {
        None => {
            tree.insert(key.to_string(), TranslationValue::Leaf(value));
        }
        Some((head, rest)) => {
            let entry = tree
                .entry(head.to_string())
                .or_insert_with(|| TranslationValue::Tree(TranslationTree::new()));
            if entry.is_leaf() {
                // Writing through a leaf discards it in favor of a subtree.
                *entry = TranslationValue::Tree(TranslationTree::new());
            }
            if let TranslationValue::Tree(subtree) = entry {
                set_nested(subtree, rest, value);
            }
        }
    }
}

fn remove_nested(tree: &mut TranslationTree, key: &str) -> bool {
    match key.split_once('.') {
        None => tree.remove(key).is_some(),
        Some((head, rest)) => match tree.get_mut(head) {
            Some(TranslationValue::Tree(subtree)) => remove_nested(subtree, rest),
            _ => false,
        },
    }
}

fn deep_merge(target: &mut TranslationTree, source: TranslationTree) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(TranslationValue::Tree(existing)), TranslationValue::Tree(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

fn count_leaves(tree: &TranslationTree) -> usize {
    tree.values()
        .map(|value| match value {
            TranslationValue::Leaf(_) => 1,
            TranslationValue::Tree(subtree) => count_leaves(subtree),
        })
        .sum()
}
