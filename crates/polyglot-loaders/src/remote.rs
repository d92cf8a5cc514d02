//! Remote HTTP translation loader

use async_trait::async_trait;
use polyglot_common::{Locale, TranslationTree};
use polyglot_core::{TranslationError, TranslationLoader, TranslationResult};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for [`RemoteLoader`]
#[derive(Debug, Clone)]
pub struct RemoteLoaderConfig {
    /// Base URL the locale path is resolved against
    pub base_url: String,
    /// Path pattern with a `{locale}` placeholder
    pub pattern: String,
    /// Extra request headers
    pub headers: HashMap<String, String>,
    /// Per-request deadline; exceeding it aborts the fetch
    pub timeout: Duration,
}

impl RemoteLoaderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            pattern: "{locale}.json".to_string(),
            headers: HashMap::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Fetches translation trees over HTTP
///
/// A single failed fetch surfaces as an error; there is no retry or backoff
/// here. Wrap this in a [`polyglot_core::CachedLoader`] to bound how often
/// the endpoint is consulted.
#[derive(Debug)]
pub struct RemoteLoader {
    config: RemoteLoaderConfig,
    base_url: Url,
    client: reqwest::Client,
    supported_locales: HashSet<Locale>,
}

impl RemoteLoader {
    /// Create a loader; fails on an invalid base URL or client configuration
    pub fn new(config: RemoteLoaderConfig) -> TranslationResult<Self> {
        // A trailing slash makes Url::join treat the last segment as a
        // directory rather than replacing it.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|error| {
            TranslationError::InvalidConfiguration(format!(
                "invalid base URL '{}': {error}",
                config.base_url
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                TranslationError::InvalidConfiguration(format!(
                    "failed to build HTTP client: {error}"
                ))
            })?;

        Ok(Self {
            config,
            base_url,
            client,
            supported_locales: HashSet::new(),
        })
    }

    /// Restrict the loader to a set of locales; empty means unrestricted
    pub fn with_supported_locales(
        mut self,
        locales: impl IntoIterator<Item = Locale>,
    ) -> Self {
        self.supported_locales = locales.into_iter().collect();
        self
    }

    fn url_for(&self, locale: &Locale) -> TranslationResult<Url> {
        let path = self.config.pattern.replace("{locale}", locale.as_str());
        self.base_url.join(&path).map_err(|error| {
            TranslationError::InvalidConfiguration(format!(
                "invalid translation path '{path}': {error}"
            ))
        })
    }

    fn map_request_error(&self, error: reqwest::Error, locale: &Locale) -> TranslationError {
        if error.is_timeout() {
            TranslationError::Timeout {
                locale: locale.clone(),
                seconds: self.config.timeout.as_secs(),
            }
        } else {
            TranslationError::LoaderFailed {
                loader: "remote".to_string(),
                locale: locale.clone(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl TranslationLoader for RemoteLoader {
    fn name(&self) -> &str {
        "remote"
    }

    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree> {
        let url = self.url_for(locale)?;
        debug!(%locale, %url, "fetching translations");

        let mut request = self.client.get(url).header("Accept", "application/json");
        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|error| self.map_request_error(error, locale))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::LoaderFailed {
                loader: "remote".to_string(),
                locale: locale.clone(),
                message: format!("HTTP {status}"),
            });
        }

        response
            .json::<TranslationTree>()
            .await
            .map_err(|error| self.map_request_error(error, locale))
    }

    fn supports(&self, locale: &Locale) -> bool {
        self.supported_locales.is_empty() || self.supported_locales.contains(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_an_invalid_base_url() {
        let error = RemoteLoader::new(RemoteLoaderConfig::new("not a url")).unwrap_err();
        assert!(matches!(error, TranslationError::InvalidConfiguration(_)));
    }

    #[test]
    fn supported_locale_set_restricts_supports() {
        let loader = RemoteLoader::new(RemoteLoaderConfig::new("https://example.com/locales"))
            .unwrap()
            .with_supported_locales([Locale::new("en"), Locale::new("fr")]);

        assert!(loader.supports(&Locale::new("fr")));
        assert!(!loader.supports(&Locale::new("de")));
    }

    #[test]
    fn url_joins_pattern_under_the_base() {
        let loader = RemoteLoader::new(RemoteLoaderConfig::new("https://example.com/locales")).unwrap();
        let url = loader.url_for(&Locale::new("pt-BR")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/locales/pt-br.json");
    }
}
