//! Client state persistence
//!
//! Serializes state to versioned JSON envelopes with checksums, atomic
//! writes, and rotating backups that are consulted when the primary file
//! fails to load.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// State not initialized
    #[error("State not initialized")]
    NotInitialized,

    /// Corruption detected
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Version mismatch
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Versioned envelope written to disk
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
struct Envelope<T> {
    /// Schema version
    version: u32,
    /// Checksum for corruption detection
    checksum: String,
    /// The actual state data
    data: T,
}

impl<T: Serialize> Envelope<T> {
    fn new(version: u32, data: T) -> Result<Self> {
        let data_json = serde_json::to_string(&data)?;
        let checksum = format!("{:x}", md5::compute(&data_json));

        Ok(Self { version, checksum, data })
    }

    fn verify_checksum(&self) -> Result<()> {
        let data_json = serde_json::to_string(&self.data)?;
        let computed = format!("{:x}", md5::compute(&data_json));

        if computed != self.checksum {
            return Err(PersistenceError::Corruption(format!(
                "Checksum mismatch: expected {}, got {}",
                self.checksum, computed
            )));
        }

        Ok(())
    }
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path to the persistence file
    pub path: PathBuf,
    /// Current schema version
    pub version: u32,
    /// Enable atomic writes with temp files
    pub atomic_writes: bool,
    /// Number of rotating backups to keep (0 disables backups)
    pub backup_count: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("circely_state.json"),
            version: 1,
            atomic_writes: true,
            backup_count: 2,
        }
    }
}

impl PersistenceConfig {
    /// Create a new configuration
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set schema version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Enable or disable atomic writes
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }

    /// Set how many rotating backups to keep
    pub fn backup_count(mut self, count: usize) -> Self {
        self.backup_count = count;
        self
    }
}

/// Persisted state manager
pub struct PersistedState<T> {
    config: PersistenceConfig,
    state: Arc<RwLock<Option<T>>>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Clone + Default,
{
    /// Create a new persisted state manager
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config, state: Arc::new(RwLock::new(None)) }
    }

    /// Initialize by loading from disk
    ///
    /// A missing file yields the default state. If the primary file fails to
    /// load, backups are tried newest first before the error is surfaced.
    pub async fn init(&self) -> Result<()> {
        let data = match self.load_from_disk().await {
            Ok(data) => data,
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                T::default()
            }
            Err(err) => match self.recover_from_backups(&err).await {
                Some(data) => data,
                None => return Err(err),
            },
        };

        let mut state = self.state.write().await;
        *state = Some(data);
        Ok(())
    }

    /// Get the current state
    pub async fn get(&self) -> Result<T> {
        let state = self.state.read().await;
        state.clone().ok_or(PersistenceError::NotInitialized)
    }

    /// Update the state and persist to disk
    pub async fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.write().await;

        if let Some(current) = state.as_mut() {
            f(current);
            self.write_to_disk(current).await?;
            Ok(())
        } else {
            Err(PersistenceError::NotInitialized)
        }
    }

    /// Set the entire state and persist
    pub async fn set(&self, new_state: T) -> Result<()> {
        let mut state = self.state.write().await;
        *state = Some(new_state.clone());
        self.write_to_disk(&new_state).await
    }

    /// Clear the persisted state
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        *state = Some(T::default());

        if self.config.path.exists() {
            fs::remove_file(&self.config.path).await?;
        }

        Ok(())
    }

    /// Path of the persistence file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Load state from the primary file
    async fn load_from_disk(&self) -> Result<T> {
        Self::load_from_path(&self.config.path, self.config.version).await
    }

    /// Load and verify an envelope from an arbitrary path
    async fn load_from_path(path: &Path, expected_version: u32) -> Result<T> {
        let contents = fs::read_to_string(path).await?;

        let envelope: Envelope<T> = serde_json::from_str(&contents)?;

        envelope.verify_checksum()?;

        if envelope.version != expected_version {
            return Err(PersistenceError::VersionMismatch {
                expected: expected_version,
                found: envelope.version,
            });
        }

        Ok(envelope.data)
    }

    /// Try backups newest first, rewriting the primary file on success
    async fn recover_from_backups(&self, cause: &PersistenceError) -> Option<T> {
        for n in 1..=self.config.backup_count {
            let backup = self.backup_path(n);

            match Self::load_from_path(&backup, self.config.version).await {
                Ok(data) => {
                    tracing::warn!(
                        backup = %backup.display(),
                        error = %cause,
                        "recovered state from backup"
                    );

                    // Rewrite the primary file so later loads see the
                    // recovered state.
                    if let Ok(json) = self.render(&data) {
                        let _ = self.write_contents(&json).await;
                    }

                    return Some(data);
                }
                Err(_) => continue,
            }
        }

        None
    }

    /// Write state to disk
    async fn write_to_disk(&self, data: &T) -> Result<()> {
        let json = self.render(data)?;

        // Snapshot the previous good file before it is replaced.
        if self.config.backup_count > 0 {
            let _ = self.rotate_backups().await;
        }

        self.write_contents(&json).await
    }

    /// Serialize state into its on-disk envelope
    fn render(&self, data: &T) -> Result<String> {
        let envelope = Envelope::new(self.config.version, data.clone())?;
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Write file contents, atomically when configured
    async fn write_contents(&self, contents: &str) -> Result<()> {
        if self.config.atomic_writes {
            let temp_path = self.config.path.with_extension("tmp");

            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(contents.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);

            // Atomic rename
            fs::rename(&temp_path, &self.config.path).await?;
        } else {
            fs::write(&self.config.path, contents).await?;
        }

        Ok(())
    }

    /// Shift existing backups and snapshot the current file as backup 1
    async fn rotate_backups(&self) -> Result<()> {
        if !self.config.path.exists() {
            return Ok(());
        }

        for n in (1..self.config.backup_count).rev() {
            let from = self.backup_path(n);
            let to = self.backup_path(n + 1);

            if from.exists() {
                let _ = fs::rename(&from, &to).await;
            }
        }

        let _ = fs::copy(&self.config.path, &self.backup_path(1)).await;
        Ok(())
    }

    /// Get backup file path
    fn backup_path(&self, n: usize) -> PathBuf {
        PathBuf::from(format!("{}.bak.{}", self.config.path.display(), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    fn config_in(dir: &TempDir) -> PersistenceConfig {
        PersistenceConfig::new(dir.path().join("state.json"))
    }

    #[tokio::test]
    async fn test_init_defaults_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let state: PersistedState<TestState> = PersistedState::new(config_in(&dir));

        state.init().await.unwrap();

        assert_eq!(state.get().await.unwrap(), TestState::default());
    }

    #[tokio::test]
    async fn test_get_before_init_fails() {
        let dir = TempDir::new().unwrap();
        let state: PersistedState<TestState> = PersistedState::new(config_in(&dir));

        assert!(matches!(state.get().await, Err(PersistenceError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_update_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        {
            let state: PersistedState<TestState> = PersistedState::new(config.clone());
            state.init().await.unwrap();

            state
                .update(|s| {
                    s.counter = 99;
                    s.name = "persisted".to_string();
                })
                .await
                .unwrap();
        }

        let state: PersistedState<TestState> = PersistedState::new(config);
        state.init().await.unwrap();

        let current = state.get().await.unwrap();
        assert_eq!(current.counter, 99);
        assert_eq!(current.name, "persisted");
    }

    #[tokio::test]
    async fn test_corruption_detected_without_backups() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).backup_count(0);

        let state: PersistedState<TestState> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        state
            .update(|s| {
                s.counter = 42;
                s.name = "corruptme".to_string();
            })
            .await
            .unwrap();

        // Tamper with the data while keeping the envelope parseable
        let contents = fs::read_to_string(&config.path).await.unwrap();
        let tampered = contents.replace("corruptme", "tampered!");
        fs::write(&config.path, tampered).await.unwrap();

        let state2: PersistedState<TestState> = PersistedState::new(config);
        let result = state2.init().await;
        assert!(matches!(result, Err(PersistenceError::Corruption(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_recovers_from_backup() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).backup_count(2);

        {
            let state: PersistedState<TestState> = PersistedState::new(config.clone());
            state.init().await.unwrap();
            state.update(|s| s.counter = 1).await.unwrap();
            state.update(|s| s.counter = 2).await.unwrap();
        }

        fs::write(&config.path, "{ not valid json").await.unwrap();

        let state: PersistedState<TestState> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        assert_eq!(state.get().await.unwrap().counter, 1);

        // The primary file was rewritten from the backup
        let reloaded: PersistedState<TestState> = PersistedState::new(config);
        reloaded.init().await.unwrap();
        assert_eq!(reloaded.get().await.unwrap().counter, 1);
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();

        {
            let config = config_in(&dir).version(1);
            let state: PersistedState<TestState> = PersistedState::new(config);
            state.init().await.unwrap();
            state.update(|s| s.counter = 7).await.unwrap();
        }

        let config = config_in(&dir).version(2);
        let state: PersistedState<TestState> = PersistedState::new(config);

        let result = state.init().await;
        assert!(matches!(
            result,
            Err(PersistenceError::VersionMismatch { expected: 2, found: 1 })
        ));
    }

    #[tokio::test]
    async fn test_atomic_write_cleans_temp() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).atomic_writes(true);

        let state: PersistedState<TestState> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        state.update(|s| s.counter = 123).await.unwrap();

        let temp_path = config.path.with_extension("tmp");
        assert!(!temp_path.exists());
    }

    #[tokio::test]
    async fn test_backup_rotation_caps_count() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).backup_count(2);

        let state: PersistedState<TestState> = PersistedState::new(config.clone());
        state.init().await.unwrap();

        for i in 1..=4 {
            state.update(|s| s.counter = i).await.unwrap();
        }

        assert!(state.backup_path(1).exists());
        assert!(state.backup_path(2).exists());
        assert!(!state.backup_path(3).exists());

        // Newest backup holds the previous write
        let backup: PersistedState<TestState> = PersistedState::new(
            PersistenceConfig::new(state.backup_path(1)).backup_count(0),
        );
        backup.init().await.unwrap();
        assert_eq!(backup.get().await.unwrap().counter, 3);
    }

    #[tokio::test]
    async fn test_clear_resets_to_default_and_removes_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let state: PersistedState<TestState> = PersistedState::new(config.clone());
        state.init().await.unwrap();
        state.update(|s| s.counter = 5).await.unwrap();

        state.clear().await.unwrap();

        assert_eq!(state.get().await.unwrap(), TestState::default());
        assert!(!config.path.exists());
    }
}
