//! Demonstrates an engine wired to a composite loader chain with events.
//!
//! Run with: `cargo run --example fallback_chain`

use polyglot_common::logging::{init_logging, LoggingConfig};
use polyglot_core::{
    EventKind, Locale, TranslateOptions, TranslationTree, Translator, TranslatorConfig,
};
use polyglot_loaders::MemoryLoader;
use std::sync::Arc;

fn tree(value: serde_json::Value) -> TranslationTree {
    serde_json::from_value(value).expect("valid translation tree")
}

#[tokio::main]
async fn main() {
    init_logging(LoggingConfig {
        level: "debug".to_string(),
        ..Default::default()
    })
    .expect("logging init");

    let translator = Translator::new(TranslatorConfig {
        fallback_locales: vec![Locale::new("es")],
        debug: true,
        ..TranslatorConfig::new("en")
    });

    translator.add_translations(
        "en",
        tree(serde_json::json!({
            "greet": "Hello {{name}}",
            "inbox": "You have one message | You have {{count}} messages"
        })),
    );
    translator.add_translations(
        "es",
        tree(serde_json::json!({ "farewell": "Adiós" })),
    );

    translator.use_loader(Arc::new(MemoryLoader::new().with_translations(
        "de",
        tree(serde_json::json!({ "greet": "Hallo {{name}}" })),
    )));

    translator.on(EventKind::LocaleChanged, |event| {
        println!("event: {event:?}");
    });
    translator.on(EventKind::TranslationMissing, |event| {
        println!("event: {event:?}");
    });

    let greeting = translator.translate("greet", &TranslateOptions::new().add_value("name", "Ana"));
    println!("en greet      -> {greeting}");

    let inbox = translator.translate(
        "inbox",
        &TranslateOptions::with_count(3).add_value("count", 3),
    );
    println!("en inbox(3)   -> {inbox}");

    // Missing in the current locale, found in the fallback chain.
    println!("es fallback   -> {}", translator.t("farewell"));

    // Switching pulls "de" through the loader before the event fires.
    translator.set_locale("de").await;
    let greeting = translator.translate("greet", &TranslateOptions::new().add_value("name", "Max"));
    println!("de greet      -> {greeting}");

    // Resolving nowhere returns the key itself.
    println!("missing key   -> {}", translator.t("not.configured"));
}
