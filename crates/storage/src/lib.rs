//! Storage layer for Circely
//!
//! This crate provides local persistence for the client: versioned JSON
//! state files, a key-value store for preferences, and the in-memory
//! cache behind the query layer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod kv;
pub mod persistence;
pub mod preferences;

pub use cache::{CacheConfig, CacheError, QueryCache};
pub use kv::{KvConfig, KvError, KvStore};
pub use persistence::{PersistedState, PersistenceConfig, PersistenceError};
pub use preferences::{AppPreferences, ColorMode, PreferencesError, PreferencesStore};
