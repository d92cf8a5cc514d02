//! The translation resolution engine
//!
//! Composes the store, formatter pipeline, plural resolver, loaders, and
//! event bus. Resolution is synchronous and never fails: the worst case for
//! a caller is receiving the bare key back. Only locale switching and
//! translation loading suspend.

use crate::config::{MissingTranslationHandler, TranslatorConfig};
use crate::detect::LocaleDetector;
use crate::events::{EventBus, EventKind, Subscription, TranslatorEvent};
use crate::formatter::{Formatter, FormatterPipeline};
use crate::interpolate::{InterpolationConfig, InterpolationFormatter};
use crate::loader::TranslationLoader;
use crate::options::TranslateOptions;
use crate::plural::{plural_key_variants, PluralFormatter};
use crate::store::TranslationStore;
use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use polyglot_common::{Locale, TranslationTree};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

type SharedLoad = Shared<BoxFuture<'static, ()>>;

/// The translation engine
///
/// Cheap to clone; clones share all state, so one instance can serve an
/// entire application.
#[derive(Clone)]
pub struct Translator {
    inner: Arc<Inner>,
}

struct Inner {
    store: RwLock<TranslationStore>,
    events: EventBus,
    detector: LocaleDetector,
    plural: Arc<PluralFormatter>,
    interpolation: Arc<InterpolationFormatter>,
    pipeline: FormatterPipeline,
    loaders: RwLock<Vec<Arc<dyn TranslationLoader>>>,
    current_locale: RwLock<Locale>,
    default_locale: Locale,
    fallback_locales: Vec<Locale>,
    supported_locales: Vec<Locale>,
    debug: AtomicBool,
    on_missing: RwLock<Option<MissingTranslationHandler>>,
    // In-flight load tickets: at most one underlying load per locale.
    loading: Mutex<HashMap<Locale, SharedLoad>>,
}

impl Translator {
    /// Create an engine from configuration
    pub fn new(config: TranslatorConfig) -> Self {
        let detector = LocaleDetector::new(config.supported_locales.clone());
        let configured_locale = config
            .current_locale
            .unwrap_or_else(|| config.default_locale.clone());
        let current_locale = if config.detect_locale {
            detector.detect().unwrap_or(configured_locale)
        } else {
            configured_locale
        };

        let plural = Arc::new(PluralFormatter::new(
            &config.pluralization,
            current_locale.clone(),
        ));
        let interpolation = Arc::new(InterpolationFormatter::new(config.interpolation));
        let pipeline = FormatterPipeline::new(vec![
            plural.clone() as Arc<dyn Formatter>,
            interpolation.clone() as Arc<dyn Formatter>,
        ]);

        Self {
            inner: Arc::new(Inner {
                store: RwLock::new(TranslationStore::with_translations(config.translations)),
                events: EventBus::new(),
                detector,
                plural,
                interpolation,
                pipeline,
                loaders: RwLock::new(Vec::new()),
                current_locale: RwLock::new(current_locale),
                default_locale: config.default_locale,
                fallback_locales: config.fallback_locales,
                supported_locales: config.supported_locales,
                debug: AtomicBool::new(config.debug),
                on_missing: RwLock::new(config.on_missing_translation),
                loading: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Resolve a key with the default options
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &TranslateOptions::new())
    }

    /// Resolve a key to a display string
    ///
    /// The effective locale is `options.locale` or the current locale. With a
    /// count, plural-suffixed key variants are tried first; a bare lookup
    /// then walks the fallback chain and the default locale. A found value
    /// runs through the formatter pipeline. A value found nowhere applies the
    /// missing policy: handler result, formatted `default_value`, or the key
    /// itself. This method always returns a string.
    pub fn translate(&self, key: &str, options: &TranslateOptions) -> String {
        let locale = options
            .locale
            .clone()
            .unwrap_or_else(|| self.locale());
        match self.resolve_translation(key, &locale, options) {
            Some(value) => {
                let mut qualified = options.clone();
                qualified.locale = Some(locale);
                self.inner.pipeline.format(&value, &qualified)
            }
            None => self.handle_missing(key, &locale, options),
        }
    }

    /// Whether the key resolves to a leaf in the given (or current) locale
    pub fn exists(&self, key: &str, locale: Option<&Locale>) -> bool {
        let target = locale.cloned().unwrap_or_else(|| self.locale());
        self.inner.store.read().has(&target, key)
    }

    /// The current locale
    pub fn locale(&self) -> Locale {
        self.inner.current_locale.read().clone()
    }

    /// The configured default locale
    pub fn default_locale(&self) -> &Locale {
        &self.inner.default_locale
    }

    /// The configured supported locales
    pub fn supported_locales(&self) -> Vec<Locale> {
        self.inner.supported_locales.clone()
    }

    /// Locales that currently have translations in the store
    pub fn available_locales(&self) -> Vec<Locale> {
        self.inner.store.read().available_locales()
    }

    /// Switch the current locale
    ///
    /// No-op when unchanged. If the new locale has no data in the store and
    /// loaders are registered, a load completes before `LocaleChanged` is
    /// emitted, so subscribers observe a populated locale rather than a
    /// transient empty one.
    pub async fn set_locale(&self, locale: impl Into<Locale>) {
        let locale = locale.into();
        let previous_locale = {
            let mut current = self.inner.current_locale.write();
            if *current == locale {
                return;
            }
            std::mem::replace(&mut *current, locale.clone())
        };

        self.inner.plural.set_locale(locale.clone());
        self.inner.detector.set_locale(locale.clone());

        let needs_load = !self.inner.store.read().has_locale(&locale)
            && !self.inner.loaders.read().is_empty();
        if needs_load {
            self.load_translations(locale.clone()).await;
        }

        self.inner.events.emit(&TranslatorEvent::LocaleChanged {
            previous_locale,
            new_locale: locale,
        });
    }

    /// Deep-merge translations for a locale into the store
    pub fn add_translations(&self, locale: impl Into<Locale>, translations: TranslationTree) {
        let locale = locale.into();
        let count = {
            let mut store = self.inner.store.write();
            store.merge_locale(&locale, translations);
            store.count(&locale)
        };
        self.inner
            .events
            .emit(&TranslatorEvent::TranslationsLoaded { locale, count });
    }

    /// Replace a locale's translations wholesale
    pub fn set_translations(&self, locale: impl Into<Locale>, translations: TranslationTree) {
        let locale = locale.into();
        let count = {
            let mut store = self.inner.store.write();
            store.replace_locale(&locale, translations);
            store.count(&locale)
        };
        self.inner
            .events
            .emit(&TranslatorEvent::TranslationsLoaded { locale, count });
    }

    /// A clone of the given (or current) locale's translation tree
    pub fn translations(&self, locale: Option<&Locale>) -> Option<TranslationTree> {
        let target = locale.cloned().unwrap_or_else(|| self.locale());
        self.inner.store.read().get_locale(&target)
    }

    /// Load translations for a locale through the registered loaders
    ///
    /// Concurrent calls for the same locale share one underlying load and
    /// observe the same merged data. Loaders are tried in registration order;
    /// the first successful non-empty tree is merged and `TranslationsLoaded`
    /// fires. A failing loader emits an `Error` event and the next loader is
    /// tried. When every loader is exhausted this completes without error and
    /// without new data; no `Err` ever surfaces here. Subscribe to
    /// [`EventKind::Error`] (or check
    /// [`available_locales`](Self::available_locales)) to observe that
    /// outcome.
    pub async fn load_translations(&self, locale: impl Into<Locale>) {
        let locale = locale.into();
        let load = {
            let mut loading = self.inner.loading.lock();
            match loading.get(&locale) {
                Some(existing) => existing.clone(),
                None => {
                    let translator = self.clone();
                    let task_locale = locale.clone();
                    let load = async move {
                        translator.do_load_translations(&task_locale).await;
                    }
                    .boxed()
                    .shared();
                    loading.insert(locale.clone(), load.clone());
                    load
                }
            }
        };

        load.await;
        self.inner.loading.lock().remove(&locale);
    }

    /// Load several locales concurrently; completes when all have settled
    ///
    /// Each locale's load is independent; one failure does not abort the
    /// others.
    pub async fn preload_translations(&self, locales: &[Locale]) {
        join_all(
            locales
                .iter()
                .map(|locale| self.load_translations(locale.clone())),
        )
        .await;
    }

    /// Register a loader at the lowest precedence
    pub fn use_loader(&self, loader: Arc<dyn TranslationLoader>) -> &Self {
        self.inner.loaders.write().push(loader);
        self
    }

    /// Remove a loader by name; returns whether one was removed
    pub fn remove_loader(&self, name: &str) -> bool {
        let mut loaders = self.inner.loaders.write();
        let before = loaders.len();
        loaders.retain(|loader| loader.name() != name);
        loaders.len() != before
    }

    /// Toggle diagnostics for missing keys and exhausted loaders
    pub fn set_debug(&self, enabled: bool) {
        self.inner.debug.store(enabled, Ordering::Relaxed);
    }

    /// Install or clear the missing-translation handler
    pub fn set_missing_handler(&self, handler: Option<MissingTranslationHandler>) {
        *self.inner.on_missing.write() = handler;
    }

    /// Replace the interpolation configuration
    pub fn set_interpolation_config(&self, config: InterpolationConfig) {
        self.inner.interpolation.set_config(config);
    }

    /// Subscribe to a lifecycle event
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&TranslatorEvent) + Send + Sync + 'static,
    {
        self.inner.events.on(kind, callback)
    }

    /// Subscribe for a single emission
    pub fn once<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&TranslatorEvent) + Send + Sync + 'static,
    {
        self.inner.events.once(kind, callback)
    }

    /// Remove a subscription
    pub fn off(&self, subscription: Subscription) -> bool {
        self.inner.events.off(subscription)
    }

    fn resolve_translation(
        &self,
        key: &str,
        locale: &Locale,
        options: &TranslateOptions,
    ) -> Option<String> {
        let store = self.inner.store.read();

        if let Some(count) = options.count {
            if let Some(plural_key) = self.resolve_plural_key(&store, key, locale, count) {
                return store.get(locale, &plural_key).map(str::to_owned);
            }
        }

        if let Some(value) = store.get(locale, key) {
            return Some(value.to_owned());
        }

        for fallback in &self.inner.fallback_locales {
            if let Some(value) = store.get(fallback, key) {
                debug!(%key, %locale, fallback = %fallback, "resolved via fallback locale");
                return Some(value.to_owned());
            }
        }

        if locale != &self.inner.default_locale {
            if let Some(value) = store.get(&self.inner.default_locale, key) {
                debug!(%key, %locale, "resolved via default locale");
                return Some(value.to_owned());
            }
        }

        None
    }

    /// Pick the plural-suffixed variant of `base_key` for this count
    ///
    /// The exact suffix for the resolved form is tried first; otherwise the
    /// variants the locale actually defines are scanned in category order and
    /// the form index is clamped to what exists, so a locale carrying fewer
    /// forms than its rule implies degrades to the last available variant.
    fn resolve_plural_key(
        &self,
        store: &TranslationStore,
        base_key: &str,
        locale: &Locale,
        count: i64,
    ) -> Option<String> {
        let suffix = self.inner.plural.plural_key_suffix(count, locale);
        let plural_key = format!("{base_key}{suffix}");
        if store.has(locale, &plural_key) {
            return Some(plural_key);
        }

        let variants = plural_key_variants(base_key);
        let available: Vec<&String> = variants
            .iter()
            .filter(|variant| store.has(locale, variant))
            .collect();
        if available.is_empty() {
            return None;
        }
        let index = self.inner.plural.plural_form_index(count, locale);
        Some(available[index.min(available.len() - 1)].clone())
    }

    fn handle_missing(&self, key: &str, locale: &Locale, options: &TranslateOptions) -> String {
        self.inner.events.emit(&TranslatorEvent::TranslationMissing {
            key: key.to_string(),
            locale: locale.clone(),
        });
        if self.inner.debug.load(Ordering::Relaxed) {
            debug!(%key, %locale, "missing translation");
        }

        let handler = self.inner.on_missing.read().clone();
        if let Some(handler) = handler {
            return handler(key, locale, options);
        }

        if let Some(default_value) = &options.default_value {
            let mut qualified = options.clone();
            qualified.locale = Some(locale.clone());
            return self.inner.pipeline.format(default_value, &qualified);
        }

        key.to_string()
    }

    async fn do_load_translations(&self, locale: &Locale) {
        let loaders: Vec<Arc<dyn TranslationLoader>> = self.inner.loaders.read().clone();

        for loader in loaders {
            if !loader.supports(locale) {
                continue;
            }
            match loader.load(locale).await {
                Ok(tree) if tree.is_empty() => {
                    debug!(loader = loader.name(), %locale, "loader returned no translations");
                }
                Ok(tree) => {
                    let count = {
                        let mut store = self.inner.store.write();
                        store.merge_locale(locale, tree);
                        store.count(locale)
                    };
                    info!(loader = loader.name(), %locale, count, "translations loaded");
                    self.inner.events.emit(&TranslatorEvent::TranslationsLoaded {
                        locale: locale.clone(),
                        count,
                    });
                    return;
                }
                Err(error) => {
                    warn!(loader = loader.name(), %locale, %error, "loader failed");
                    self.inner.events.emit(&TranslatorEvent::Error {
                        message: error.to_string(),
                        context: Some(format!(
                            "failed to load translations for locale '{locale}' using loader '{}'",
                            loader.name()
                        )),
                    });
                }
            }
        }

        if self.inner.debug.load(Ordering::Relaxed) {
            debug!(%locale, "no loader could provide translations");
        }
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("current_locale", &*self.inner.current_locale.read())
            .field("default_locale", &self.inner.default_locale)
            .field("fallback_locales", &self.inner.fallback_locales)
            .field("loaders", &self.inner.loaders.read().len())
            .finish()
    }
}
