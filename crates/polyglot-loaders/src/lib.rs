//! Concrete translation loaders for Polyglot
//!
//! Three sources of translation trees, all implementing
//! [`polyglot_core::TranslationLoader`]:
//!
//! - [`MemoryLoader`]: trees registered in code, mostly for tests and seeds
//! - [`FileLoader`]: JSON documents under a base directory
//! - [`RemoteLoader`]: JSON fetched over HTTP with a per-request deadline
//!
//! Compose them with the core decorators: wrap a [`RemoteLoader`] in a
//! [`polyglot_core::CachedLoader`] to bound fetch frequency, or put a
//! [`FileLoader`] behind a [`polyglot_core::CompositeLoader`] as the offline
//! fallback of a remote source.

pub mod file;
pub mod memory;
pub mod remote;

pub use file::FileLoader;
pub use memory::MemoryLoader;
pub use remote::{RemoteLoader, RemoteLoaderConfig};
