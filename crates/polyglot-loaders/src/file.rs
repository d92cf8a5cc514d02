//! JSON file translation loader

use async_trait::async_trait;
use polyglot_common::{Locale, TranslationTree};
use polyglot_core::{TranslationLoader, TranslationResult};
use std::path::PathBuf;
use tracing::debug;

/// Loads translation trees from JSON documents under a base directory
///
/// The file for a locale is `pattern` with `{locale}` substituted, resolved
/// against the base directory; the default pattern is `{locale}.json`. A
/// missing or malformed file surfaces as a load error, which composite
/// resolution and the engine treat like any other loader failure.
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_dir: PathBuf,
    pattern: String,
}

impl FileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            pattern: "{locale}.json".to_string(),
        }
    }

    /// Override the file-name pattern, e.g. `"locales/{locale}/main.json"`
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    fn path_for(&self, locale: &Locale) -> PathBuf {
        self.base_dir
            .join(self.pattern.replace("{locale}", locale.as_str()))
    }
}

#[async_trait]
impl TranslationLoader for FileLoader {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, locale: &Locale) -> TranslationResult<TranslationTree> {
        let path = self.path_for(locale);
        debug!(%locale, path = %path.display(), "loading translation file");

        let content = tokio::fs::read_to_string(&path).await?;
        let tree: TranslationTree = serde_json::from_str(&content)?;

        debug!(%locale, path = %path.display(), "loaded translation file");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::TranslationError;
    use std::fs;
    use tempfile::TempDir;

    fn locales_dir() -> TempDir {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(
            dir.path().join("en.json"),
            r#"{ "greet": "Hello", "errors": { "notFound": "Not found" } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_a_locale_file() {
        let dir = locales_dir();
        let loader = FileLoader::new(dir.path());

        let tree = loader.load(&Locale::new("en")).await.unwrap();
        assert_eq!(tree["greet"].as_leaf(), Some("Hello"));
        assert_eq!(
            tree["errors"].as_tree().unwrap()["notFound"].as_leaf(),
            Some("Not found")
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = locales_dir();
        let loader = FileLoader::new(dir.path());

        let error = loader.load(&Locale::new("fr")).await.unwrap_err();
        assert!(matches!(error, TranslationError::Io(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let dir = locales_dir();
        let loader = FileLoader::new(dir.path());

        let error = loader.load(&Locale::new("broken")).await.unwrap_err();
        assert!(matches!(error, TranslationError::Parse(_)));
    }

    #[tokio::test]
    async fn pattern_substitutes_the_locale() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pt-br")).unwrap();
        fs::write(dir.path().join("pt-br/main.json"), r#"{ "greet": "Olá" }"#).unwrap();

        let loader = FileLoader::new(dir.path()).with_pattern("{locale}/main.json");
        let tree = loader.load(&Locale::new("pt-BR")).await.unwrap();
        assert_eq!(tree["greet"].as_leaf(), Some("Olá"));
    }
}
