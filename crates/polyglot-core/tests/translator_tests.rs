//! Integration tests for the resolution engine

use async_trait::async_trait;
use polyglot_core::{
    EventKind, Locale, TranslateOptions, TranslationError, TranslationLoader, TranslationResult,
    TranslationTree, Translator, TranslatorConfig, TranslatorEvent,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn tree(value: serde_json::Value) -> TranslationTree {
    serde_json::from_value(value).unwrap()
}

fn translator() -> Translator {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations(
        "en",
        tree(serde_json::json!({
            "greet": "Hello {{name}}",
            "farewell": "Goodbye",
            "nested": { "deep": "value" }
        })),
    );
    translator
}

/// A loader for tests: configurable tree, failure mode, supported set,
/// artificial latency, and an invocation counter.
struct TestLoader {
    name: String,
    trees: HashMap<Locale, TranslationTree>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
    fail: bool,
    supported: Option<Vec<Locale>>,
}

impl TestLoader {
    fn serving(name: &str, locale: &str, value: serde_json::Value) -> Self {
        let mut trees = HashMap::new();
        trees.insert(Locale::new(locale), tree(value));
        Self {
            name: name.to_string(),
            trees,
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
            fail: false,
            supported: None,
        }
    }

    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trees: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
            fail: false,
            supported: None,
        }
    }

    fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::empty(name)
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn supporting(mut self, locales: &[&str]) -> Self {
        self.supported = Some(locales.iter().map(|l| Locale::new(*l)).collect());
        self
    }

    fn call_count(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl TranslationLoader for TestLoader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(TranslationError::LoaderFailed {
                loader: self.name.clone(),
                locale: locale.clone(),
                message: "unavailable".to_string(),
            });
        }
        Ok(self.trees.get(locale).cloned().unwrap_or_default())
    }

    fn supports(&self, locale: &Locale) -> bool {
        match &self.supported {
            Some(locales) => locales.contains(locale),
            None => true,
        }
    }
}

fn missing_events(translator: &Translator) -> Arc<AtomicUsize> {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = counter.clone();
    translator.on(EventKind::TranslationMissing, move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    counter
}

#[test]
fn resolves_a_simple_key() {
    assert_eq!(translator().t("farewell"), "Goodbye");
    assert_eq!(translator().t("nested.deep"), "value");
}

#[test]
fn interpolates_values() {
    let result = translator().translate("greet", &TranslateOptions::new().add_value("name", "Ana"));
    assert_eq!(result, "Hello Ana");
}

#[test]
fn missing_key_returns_the_key_and_fires_one_event() {
    let translator = translator();
    let missing = missing_events(&translator);

    assert_eq!(translator.t("does.not.exist"), "does.not.exist");
    assert_eq!(missing.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_key_uses_default_value_formatted() {
    let translator = translator();
    let options = TranslateOptions::new()
        .set_default_value("Hi {{name}}")
        .add_value("name", "Ana");

    assert_eq!(translator.translate("does.not.exist", &options), "Hi Ana");
}

#[test]
fn missing_handler_takes_precedence_over_default_value() {
    let translator = translator();
    translator.set_missing_handler(Some(Arc::new(|key, locale, _options| {
        format!("[{locale}:{key}]")
    })));

    let options = TranslateOptions::new().set_default_value("unused");
    assert_eq!(
        translator.translate("does.not.exist", &options),
        "[en:does.not.exist]"
    );

    translator.set_missing_handler(None);
    assert_eq!(translator.translate("does.not.exist", &options), "unused");
}

#[test]
fn falls_back_to_default_locale() {
    let translator = translator();
    translator.add_translations("fr", tree(serde_json::json!({ "farewell": "Au revoir" })));

    // "greet" is missing in fr, present in the default locale.
    let result = translator.translate(
        "greet",
        &TranslateOptions::with_locale("fr").add_value("name", "Ana"),
    );
    assert_eq!(result, "Hello Ana");
    assert_eq!(
        translator.translate("farewell", &TranslateOptions::with_locale("fr")),
        "Au revoir"
    );
}

#[test]
fn fallback_locales_are_tried_in_order() {
    let translator = Translator::new(TranslatorConfig {
        fallback_locales: vec![Locale::new("es"), Locale::new("pt")],
        ..TranslatorConfig::new("en")
    });
    translator.add_translations("es", tree(serde_json::json!({ "shared": "es wins" })));
    translator.add_translations("pt", tree(serde_json::json!({ "shared": "pt", "only": "pt only" })));

    let options = TranslateOptions::with_locale("fr");
    assert_eq!(translator.translate("shared", &options), "es wins");
    assert_eq!(translator.translate("only", &options), "pt only");
}

#[test]
fn plural_suffix_resolution_hits_the_exact_variant() {
    // Suffixes are positional: the rule's form index maps straight into the
    // suffix list, so for the two-form English rule the forms live at
    // `_zero` (index 0) and `_one` (index 1).
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations(
        "en",
        tree(serde_json::json!({
            "item_zero": "{{count}} item",
            "item_one": "{{count}} items"
        })),
    );

    assert_eq!(
        translator.translate("item", &TranslateOptions::with_count(1).add_value("count", 1)),
        "1 item"
    );
    assert_eq!(
        translator.translate("item", &TranslateOptions::with_count(5).add_value("count", 5)),
        "5 items"
    );
}

#[test]
fn plural_resolution_scans_variants_when_the_exact_suffix_misses() {
    // count=1 resolves to suffix `_zero`, which is absent; the variants that
    // do exist are scanned in category order and index 0 picks `item_one`.
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations(
        "en",
        tree(serde_json::json!({
            "item_one": "{{count}} item",
            "item_other": "{{count}} items"
        })),
    );

    assert_eq!(
        translator.translate("item", &TranslateOptions::with_count(1).add_value("count", 1)),
        "1 item"
    );
}

#[test]
fn plural_resolution_degrades_to_last_available_variant() {
    // ru reports form index 2 (many) for count=5, but only two variants
    // exist; resolution degrades to the last one present.
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations(
        "ru",
        tree(serde_json::json!({
            "item_one": "{{count}} файл",
            "item_other": "{{count}} файлов"
        })),
    );

    let result = translator.translate(
        "item",
        &TranslateOptions::with_count(5)
            .set_locale("ru")
            .add_value("count", 5),
    );
    assert_eq!(result, "5 файлов");
}

#[test]
fn count_without_plural_variants_falls_back_to_bare_key() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations(
        "en",
        tree(serde_json::json!({ "plain": "one thing | {{count}} things" })),
    );

    // No suffixed variants exist; the bare value's |-forms are selected by
    // the pipeline instead.
    assert_eq!(
        translator.translate("plain", &TranslateOptions::with_count(3).add_value("count", 3)),
        "3 things"
    );
    assert_eq!(
        translator.translate("plain", &TranslateOptions::with_count(1)),
        "one thing"
    );
}

#[test]
fn exists_checks_the_given_or_current_locale() {
    let translator = translator();
    assert!(translator.exists("greet", None));
    assert!(!translator.exists("greet", Some(&Locale::new("fr"))));
    assert!(!translator.exists("nested", None));
}

#[test]
fn locale_identifiers_are_case_insensitive() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations("pt-BR", tree(serde_json::json!({ "greet": "Olá" })));

    assert_eq!(
        translator.translate("greet", &TranslateOptions::with_locale("PT_br")),
        "Olá"
    );
}

#[test]
fn add_translations_merges_and_set_translations_replaces() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations("en", tree(serde_json::json!({ "a": "1", "b": "2" })));
    translator.add_translations("en", tree(serde_json::json!({ "b": "20", "c": "30" })));

    assert_eq!(translator.t("a"), "1");
    assert_eq!(translator.t("b"), "20");
    assert_eq!(translator.t("c"), "30");

    translator.set_translations("en", tree(serde_json::json!({ "only": "left" })));
    assert_eq!(translator.t("only"), "left");
    assert_eq!(translator.t("a"), "a");
}

#[test]
fn translations_loaded_event_reports_leaf_count() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    let counts: Arc<parking_lot::Mutex<Vec<usize>>> = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let seen = counts.clone();
    translator.on(EventKind::TranslationsLoaded, move |event| {
        if let TranslatorEvent::TranslationsLoaded { count, .. } = event {
            seen.lock().push(*count);
        }
    });

    translator.add_translations("en", tree(serde_json::json!({ "a": "1", "b": { "c": "2" } })));
    translator.add_translations("en", tree(serde_json::json!({ "d": "3" })));

    assert_eq!(*counts.lock(), vec![2, 3]);
}

#[tokio::test]
async fn set_locale_emits_event_with_previous_and_new() {
    let translator = translator();
    let events: Arc<parking_lot::Mutex<Vec<(Locale, Locale)>>> =
        Arc::new(parking_lot::Mutex::new(Vec::new()));

    let seen = events.clone();
    translator.on(EventKind::LocaleChanged, move |event| {
        if let TranslatorEvent::LocaleChanged {
            previous_locale,
            new_locale,
        } = event
        {
            seen.lock().push((previous_locale.clone(), new_locale.clone()));
        }
    });

    translator.set_locale("fr").await;
    translator.set_locale("fr").await; // unchanged: no event

    assert_eq!(translator.locale(), Locale::new("fr"));
    assert_eq!(
        *events.lock(),
        vec![(Locale::new("en"), Locale::new("fr"))]
    );
}

#[tokio::test]
async fn set_locale_loads_translations_before_emitting() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    let loader = TestLoader::serving("static", "de", serde_json::json!({ "greet": "Hallo" }));
    translator.use_loader(Arc::new(loader));

    let populated = Arc::new(AtomicUsize::new(0));
    let seen = populated.clone();
    let observer = translator.clone();
    translator.on(EventKind::LocaleChanged, move |_| {
        // The locale must already be populated when subscribers run.
        if observer.exists("greet", Some(&Locale::new("de"))) {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    translator.set_locale("de").await;

    assert_eq!(populated.load(Ordering::SeqCst), 1);
    assert_eq!(translator.t("greet"), "Hallo");
}

#[tokio::test]
async fn concurrent_loads_for_one_locale_are_deduplicated() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    let loader = TestLoader::serving("slow", "de", serde_json::json!({ "greet": "Hallo" }))
        .with_delay(Duration::from_millis(20));
    let calls = loader.call_count();
    translator.use_loader(Arc::new(loader));

    tokio::join!(
        translator.load_translations("de"),
        translator.load_translations("de"),
        translator.load_translations("de"),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(translator.exists("greet", Some(&Locale::new("de"))));
}

#[tokio::test]
async fn loads_for_different_locales_proceed_independently() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    let de = TestLoader::serving("de-only", "de", serde_json::json!({ "greet": "Hallo" }))
        .supporting(&["de"]);
    let fr = TestLoader::serving("fr-only", "fr", serde_json::json!({ "greet": "Bonjour" }))
        .supporting(&["fr"]);
    translator.use_loader(Arc::new(de)).use_loader(Arc::new(fr));

    translator
        .preload_translations(&[Locale::new("de"), Locale::new("fr")])
        .await;

    assert!(translator.exists("greet", Some(&Locale::new("de"))));
    assert!(translator.exists("greet", Some(&Locale::new("fr"))));
}

#[tokio::test]
async fn failing_loader_falls_through_to_the_next() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    let errors = Arc::new(AtomicUsize::new(0));
    let seen = errors.clone();
    translator.on(EventKind::Error, move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    translator
        .use_loader(Arc::new(TestLoader::failing("broken")))
        .use_loader(Arc::new(TestLoader::serving(
            "backup",
            "de",
            serde_json::json!({ "greet": "Hallo" }),
        )));

    translator.load_translations("de").await;

    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert!(translator.exists("greet", Some(&Locale::new("de"))));
}

#[tokio::test]
async fn empty_and_unsupported_loaders_are_skipped() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    let unsupported =
        TestLoader::serving("wrong", "de", serde_json::json!({ "x": "no" })).supporting(&["fr"]);
    let unsupported_calls = unsupported.call_count();

    translator
        .use_loader(Arc::new(unsupported))
        .use_loader(Arc::new(TestLoader::empty("empty")))
        .use_loader(Arc::new(TestLoader::serving(
            "real",
            "de",
            serde_json::json!({ "greet": "Hallo" }),
        )));

    translator.load_translations("de").await;

    assert_eq!(unsupported_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        translator.translate("greet", &TranslateOptions::with_locale("de")),
        "Hallo"
    );
}

#[tokio::test]
async fn exhausted_loaders_complete_without_error() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations("en", tree(serde_json::json!({ "greet": "Hello" })));
    translator.use_loader(Arc::new(TestLoader::failing("broken")));

    // Loading fails entirely, but neither call surfaces an error, and
    // resolution degrades to the default locale.
    translator.load_translations("de").await;
    translator.set_locale("de").await;

    assert_eq!(translator.t("greet"), "Hello");
    assert!(!translator.exists("greet", Some(&Locale::new("de"))));
}

#[tokio::test]
async fn remove_loader_by_name() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.use_loader(Arc::new(TestLoader::serving(
        "removable",
        "de",
        serde_json::json!({ "greet": "Hallo" }),
    )));

    assert!(translator.remove_loader("removable"));
    assert!(!translator.remove_loader("removable"));

    translator.load_translations("de").await;
    assert!(!translator.exists("greet", Some(&Locale::new("de"))));
}

#[test]
fn available_locales_reflects_the_store() {
    let translator = translator();
    translator.add_translations("fr", tree(serde_json::json!({ "a": "1" })));

    let mut locales = translator.available_locales();
    locales.sort();
    assert_eq!(locales, vec![Locale::new("en"), Locale::new("fr")]);
}

#[test]
fn translations_returns_a_cloned_snapshot() {
    let translator = translator();

    let snapshot = translator.translations(None).unwrap();
    assert_eq!(snapshot["farewell"].as_leaf(), Some("Goodbye"));
    assert!(translator.translations(Some(&Locale::new("xx"))).is_none());
    assert_eq!(translator.default_locale(), &Locale::new("en"));
}

#[test]
fn interpolation_config_can_be_replaced_at_runtime() {
    let translator = Translator::new(TranslatorConfig::new("en"));
    translator.add_translations("en", tree(serde_json::json!({ "greet": "Hello %name%" })));

    translator.set_interpolation_config(polyglot_core::InterpolationConfig {
        prefix: "%".to_string(),
        suffix: "%".to_string(),
        ..Default::default()
    });

    let result = translator.translate("greet", &TranslateOptions::new().add_value("name", "Ana"));
    assert_eq!(result, "Hello Ana");
}

#[test]
fn off_unsubscribes_translator_events() {
    let translator = translator();
    let missing = Arc::new(AtomicUsize::new(0));

    let seen = missing.clone();
    let subscription = translator.on(EventKind::TranslationMissing, move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    translator.t("nope");
    assert!(translator.off(subscription));
    translator.t("nope");

    assert_eq!(missing.load(Ordering::SeqCst), 1);
}
