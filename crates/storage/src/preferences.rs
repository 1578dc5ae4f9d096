//! Locally persisted application preferences
//!
//! Preferences are small, schema-light settings (color mode, counter display,
//! notification toggles) stored as a single JSON document in the key-value
//! store. Unreadable documents fall back to defaults rather than failing the
//! client.

use crate::kv::{KvConfig, KvError, KvStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key for the preferences document
const PREFS_KEY: &str = "app:preferences";

/// Preferences error types
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// Key-value store error
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),
}

/// Result type for preference operations
pub type Result<T> = std::result::Result<T, PreferencesError>;

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Follow the platform color scheme
    #[default]
    System,
    /// Always light
    Light,
    /// Always dark
    Dark,
}

/// Application preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppPreferences {
    /// Color scheme preference
    pub color_mode: ColorMode,
    /// Identifier of the sobriety counter display mode
    pub counter_mode: String,
    /// Whether circle activity notifications are enabled
    pub notify_circle: bool,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::System,
            counter_mode: "clock".to_string(),
            notify_circle: true,
        }
    }
}

/// Preference store backed by [`KvStore`]
#[derive(Clone)]
pub struct PreferencesStore {
    store: KvStore,
}

impl PreferencesStore {
    /// Open a preference store with the given key-value configuration
    pub fn open(config: KvConfig) -> Result<Self> {
        Ok(Self { store: KvStore::open(config)? })
    }

    /// Open an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self { store: KvStore::in_memory()? })
    }

    /// Wrap an already opened key-value store
    pub fn with_store(store: KvStore) -> Self {
        Self { store }
    }

    /// Load preferences
    ///
    /// Missing or unreadable documents yield defaults. Only database errors
    /// surface to the caller.
    pub fn load(&self) -> Result<AppPreferences> {
        match self.store.get::<AppPreferences>(PREFS_KEY) {
            Ok(Some(prefs)) => Ok(prefs),
            Ok(None) => Ok(AppPreferences::default()),
            Err(KvError::Serialization(e)) => {
                tracing::warn!(error = %e, "unreadable preferences, using defaults");
                Ok(AppPreferences::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save preferences
    pub fn save(&self, prefs: &AppPreferences) -> Result<()> {
        self.store.set(PREFS_KEY, prefs)?;
        Ok(())
    }

    /// Apply a change to the stored preferences and return the result
    pub fn update<F>(&self, f: F) -> Result<AppPreferences>
    where
        F: FnOnce(&mut AppPreferences),
    {
        let mut prefs = self.load()?;
        f(&mut prefs);
        self.save(&prefs)?;
        Ok(prefs)
    }
}
