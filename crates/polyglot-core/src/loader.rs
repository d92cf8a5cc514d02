//! Asynchronous translation sources
//!
//! A loader is a named source of a translation tree for one locale. Loaders
//! are composed by decoration: [`CompositeLoader`] tries an ordered list and
//! returns the first non-empty result, [`CachedLoader`] adds a TTL cache in
//! front of any other loader.

use crate::error::{TranslationError, TranslationResult};
use async_trait::async_trait;
use futures::future::join_all;
use moka::future::Cache;
use polyglot_common::{Locale, TranslationTree};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// An asynchronous source of translations for a locale
#[async_trait]
pub trait TranslationLoader: Send + Sync {
    /// Name used for registration, removal, and error reporting
    fn name(&self) -> &str;

    /// Fetch the translation tree for a locale
    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree>;

    /// Whether this loader can serve the locale; defaults to true
    fn supports(&self, _locale: &Locale) -> bool {
        true
    }
}

/// Tries an ordered list of loaders, returning the first non-empty result
///
/// Unsupported loaders are skipped and failures fall through to the next
/// loader; order determines precedence. If every loader fails or returns an
/// empty tree, the load fails with
/// [`TranslationError::AllLoadersExhausted`].
pub struct CompositeLoader {
    loaders: Vec<Arc<dyn TranslationLoader>>,
}

impl CompositeLoader {
    pub fn new(loaders: Vec<Arc<dyn TranslationLoader>>) -> Self {
        Self { loaders }
    }

    /// Append a loader at the lowest precedence
    pub fn add_loader(&mut self, loader: Arc<dyn TranslationLoader>) {
        self.loaders.push(loader);
    }

    /// Remove a loader by name; returns whether one was removed
    pub fn remove_loader(&mut self, name: &str) -> bool {
        let before = self.loaders.len();
        self.loaders.retain(|loader| loader.name() != name);
        self.loaders.len() != before
    }
}

#[async_trait]
impl TranslationLoader for CompositeLoader {
    fn name(&self) -> &str {
        "composite"
    }

    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree> {
        for loader in &self.loaders {
            if !loader.supports(locale) {
                continue;
            }
            match loader.load(locale).await {
                Ok(tree) if !tree.is_empty() => return Ok(tree),
                Ok(_) => {
                    debug!(loader = loader.name(), %locale, "loader returned an empty tree");
                }
                Err(error) => {
                    debug!(loader = loader.name(), %locale, %error, "loader failed, trying next");
                }
            }
        }
        Err(TranslationError::AllLoadersExhausted {
            locale: locale.clone(),
        })
    }

    fn supports(&self, locale: &Locale) -> bool {
        self.loaders.iter().any(|loader| loader.supports(locale))
    }
}

/// Wraps a loader with a time-to-live cache
///
/// Loads inside the TTL window return the cached tree without invoking the
/// wrapped loader. Concurrent loads for the same locale coalesce into one
/// underlying call.
pub struct CachedLoader {
    name: String,
    inner: Arc<dyn TranslationLoader>,
    cache: Cache<Locale, TranslationTree>,
}

impl CachedLoader {
    pub fn new(inner: Arc<dyn TranslationLoader>, ttl: Duration) -> Self {
        let name = format!("cached-{}", inner.name());
        let cache = Cache::builder().time_to_live(ttl).build();
        Self { name, inner, cache }
    }

    /// Warm the cache for a batch of locales concurrently
    ///
    /// All loads settle before this returns; the first failure (if any) is
    /// reported after the batch completes.
    pub async fn preload(&self, locales: &[Locale]) -> TranslationResult<()> {
        let results = join_all(locales.iter().map(|locale| self.load(locale))).await;
        for result in results {
            result?;
        }
        Ok(())
    }

    /// Drop the cached tree for one locale
    pub async fn invalidate(&self, locale: &Locale) {
        self.cache.invalidate(locale).await;
    }

    /// Drop all cached trees
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl TranslationLoader for CachedLoader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree> {
        self.cache
            .try_get_with(locale.clone(), self.inner.load(locale))
            .await
            .map_err(|error: Arc<TranslationError>| TranslationError::LoaderFailed {
                loader: self.inner.name().to_string(),
                locale: locale.clone(),
                message: error.to_string(),
            })
    }

    fn supports(&self, locale: &Locale) -> bool {
        self.inner.supports(locale)
    }
}
