//! Plural-form resolution
//!
//! Maps a `(count, locale)` pair to a plural-form index through per-locale
//! rule functions. The built-in table covers the common rule families
//! (one/other Germanic and Romance, three-form Slavic, six-form Arabic,
//! no-plural CJK); callers extend or replace rules per locale. This is a
//! deliberately small table, not a full CLDR engine.

use crate::formatter::Formatter;
use crate::options::TranslateOptions;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use polyglot_common::Locale;
use std::collections::HashMap;
use std::sync::Arc;

/// A plural rule: maps an absolute count to a form index
pub type PluralRule = Arc<dyn Fn(u64) -> usize + Send + Sync>;

/// Key suffixes in plural-category order: zero, one, two, few, many, other
pub const PLURAL_SUFFIXES: [&str; 6] = ["_zero", "_one", "_two", "_few", "_many", "_other"];

/// Configuration for pluralization
///
/// Rules merge over the built-in table at construction; an override for an
/// existing locale fully replaces the built-in rule for that locale.
#[derive(Clone, Default)]
pub struct PluralizationConfig {
    pub rules: HashMap<Locale, PluralRule>,
}

impl std::fmt::Debug for PluralizationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluralizationConfig")
            .field("rules", &self.rules.len())
            .finish()
    }
}

fn one_other(n: u64) -> usize {
    usize::from(n != 1)
}

fn zero_one_other(n: u64) -> usize {
    usize::from(n > 1)
}

fn russian_rule(n: u64) -> usize {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if mod10 == 1 && mod100 != 11 {
        0
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        1
    } else {
        2
    }
}

fn polish_rule(n: u64) -> usize {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if n == 1 {
        0
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        1
    } else {
        2
    }
}

fn czech_rule(n: u64) -> usize {
    if n == 1 {
        0
    } else if (2..=4).contains(&n) {
        1
    } else {
        2
    }
}

fn arabic_rule(n: u64) -> usize {
    match n {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => {
            let mod100 = n % 100;
            if (3..=10).contains(&mod100) {
                3
            } else if mod100 >= 11 {
                4
            } else {
                5
            }
        }
    }
}

fn no_plural(_n: u64) -> usize {
    0
}

static BUILTIN_RULES: Lazy<HashMap<&'static str, PluralRule>> = Lazy::new(|| {
    let mut rules: HashMap<&'static str, PluralRule> = HashMap::new();
    for lang in ["en", "de", "es", "it", "pt", "nl"] {
        rules.insert(lang, Arc::new(one_other));
    }
    rules.insert("fr", Arc::new(zero_one_other));
    rules.insert("ru", Arc::new(russian_rule));
    rules.insert("pl", Arc::new(polish_rule));
    rules.insert("cs", Arc::new(czech_rule));
    rules.insert("ar", Arc::new(arabic_rule));
    for lang in ["zh", "ja", "ko", "vi"] {
        rules.insert(lang, Arc::new(no_plural));
    }
    rules
});

/// Resolves plural forms and selects among `|`-delimited variants
///
/// Rule lookup tries the exact locale, then its base language, then falls
/// back to the `en` rule. Rules always see the absolute count.
pub struct PluralFormatter {
    rules: RwLock<HashMap<String, PluralRule>>,
    locale: RwLock<Locale>,
}

impl PluralFormatter {
    pub fn new(config: &PluralizationConfig, locale: Locale) -> Self {
        let mut rules: HashMap<String, PluralRule> = BUILTIN_RULES
            .iter()
            .map(|(lang, rule)| (lang.to_string(), rule.clone()))
            .collect();
        for (rule_locale, rule) in &config.rules {
            rules.insert(rule_locale.as_str().to_string(), rule.clone());
        }
        Self {
            rules: RwLock::new(rules),
            locale: RwLock::new(locale),
        }
    }

    /// Set the locale used when a request carries no locale of its own
    pub fn set_locale(&self, locale: Locale) {
        *self.locale.write() = locale;
    }

    /// Register or replace the rule for a locale at runtime
    pub fn add_rule(&self, locale: &Locale, rule: PluralRule) {
        self.rules.write().insert(locale.as_str().to_string(), rule);
    }

    /// The plural-form index for a count in the given locale
    pub fn plural_form_index(&self, count: i64, locale: &Locale) -> usize {
        let rules = self.rules.read();
        let rule = rules
            .get(locale.as_str())
            .or_else(|| rules.get(locale.base_language()))
            .or_else(|| rules.get("en"));
        match rule {
            Some(rule) => rule(count.unsigned_abs()),
            None => one_other(count.unsigned_abs()),
        }
    }

    /// The key suffix (`_zero` … `_other`) for a count, clamped to the suffix list
    pub fn plural_key_suffix(&self, count: i64, locale: &Locale) -> &'static str {
        let index = self.plural_form_index(count, locale);
        PLURAL_SUFFIXES[index.min(PLURAL_SUFFIXES.len() - 1)]
    }

    /// Select one form from a `|`-delimited value, clamped to the forms present
    ///
    /// Fewer forms than categories is legal; the last form absorbs overflow.
    pub fn select_plural_form(&self, value: &str, count: i64, locale: &Locale) -> String {
        let forms: Vec<&str> = value.split('|').map(str::trim).collect();
        let index = self.plural_form_index(count, locale);
        forms[index.min(forms.len() - 1)].to_string()
    }
}

impl Formatter for PluralFormatter {
    fn name(&self) -> &'static str {
        "plural"
    }

    fn format(&self, value: &str, options: &TranslateOptions) -> String {
        let Some(count) = options.count else {
            return value.to_string();
        };
        if !value.contains('|') {
            return value.to_string();
        }
        let locale = options
            .locale
            .clone()
            .unwrap_or_else(|| self.locale.read().clone());
        self.select_plural_form(value, count, &locale)
    }
}

impl std::fmt::Debug for PluralFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluralFormatter")
            .field("rules", &self.rules.read().len())
            .field("locale", &*self.locale.read())
            .finish()
    }
}

/// The six suffixed key variants for a base key, in category order
pub fn plural_key_variants(base_key: &str) -> Vec<String> {
    PLURAL_SUFFIXES
        .iter()
        .map(|suffix| format!("{base_key}{suffix}"))
        .collect()
}

/// Strip a plural suffix from a key, if it carries one
pub fn strip_plural_suffix(key: &str) -> Option<&str> {
    PLURAL_SUFFIXES
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))
}
