//! Typed publish/subscribe for translator lifecycle signals

use parking_lot::RwLock;
use polyglot_common::Locale;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::error;

/// A lifecycle event emitted by the translator
#[derive(Debug, Clone, PartialEq)]
pub enum TranslatorEvent {
    /// The current locale changed
    LocaleChanged {
        previous_locale: Locale,
        new_locale: Locale,
    },
    /// Translations were merged or replaced for a locale
    TranslationsLoaded { locale: Locale, count: usize },
    /// A key resolved nowhere (no locale in the fallback chain had it)
    TranslationMissing { key: String, locale: Locale },
    /// A load-path failure, reported for observability and otherwise absorbed
    Error {
        message: String,
        context: Option<String>,
    },
}

impl TranslatorEvent {
    /// The discriminant used for subscription
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LocaleChanged { .. } => EventKind::LocaleChanged,
            Self::TranslationsLoaded { .. } => EventKind::TranslationsLoaded,
            Self::TranslationMissing { .. } => EventKind::TranslationMissing,
            Self::Error { .. } => EventKind::Error,
        }
    }
}

/// Event tags that can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LocaleChanged,
    TranslationsLoaded,
    TranslationMissing,
    Error,
}

/// Unsubscribe token returned by [`EventBus::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
}

type EventCallback = Arc<dyn Fn(&TranslatorEvent) + Send + Sync>;

struct ListenerEntry {
    id: u64,
    once: bool,
    callback: EventCallback,
}

/// Mapping from event tag to registered callbacks
///
/// Listeners run synchronously within [`emit`](Self::emit). A panicking
/// listener is caught and logged; it never interrupts emission to the
/// remaining listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<EventKind, Vec<ListenerEntry>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event kind; the returned token unsubscribes via [`off`](Self::off)
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&TranslatorEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, callback, false)
    }

    /// Subscribe for a single emission; the entry is dropped after it fires
    pub fn once<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&TranslatorEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, callback, true)
    }

    fn subscribe<F>(&self, kind: EventKind, callback: F, once: bool) -> Subscription
    where
        F: Fn(&TranslatorEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().entry(kind).or_default().push(ListenerEntry {
            id,
            once,
            callback: Arc::new(callback),
        });
        Subscription { kind, id }
    }

    /// Remove a subscription; returns whether it was still registered
    pub fn off(&self, subscription: Subscription) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.get_mut(&subscription.kind) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|entry| entry.id != subscription.id);
                entries.len() != before
            }
            None => false,
        }
    }

    /// Emit an event to all listeners registered for its kind
    pub fn emit(&self, event: &TranslatorEvent) {
        let to_invoke: Vec<EventCallback> = {
            let mut listeners = self.listeners.write();
            match listeners.get_mut(&event.kind()) {
                Some(entries) => {
                    let callbacks = entries.iter().map(|e| e.callback.clone()).collect();
                    entries.retain(|e| !e.once);
                    callbacks
                }
                None => return,
            }
        };

        for callback in to_invoke {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                error!(kind = ?event.kind(), "event listener panicked");
            }
        }
    }

    /// Number of listeners registered for an event kind
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.read().get(&kind).map_or(0, Vec::len)
    }

    /// Drop all listeners for one kind, or for every kind
    pub fn remove_all(&self, kind: Option<EventKind>) {
        let mut listeners = self.listeners.write();
        match kind {
            Some(kind) => {
                listeners.remove(&kind);
            }
            None => listeners.clear(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.read();
        f.debug_struct("EventBus")
            .field("kinds", &listeners.len())
            .field("listeners", &listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}
