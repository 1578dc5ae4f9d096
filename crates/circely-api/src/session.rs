//! Locally persisted session
//!
//! The signed-in member is written to disk so the client restores its session
//! across launches. Records hold display-ready strings produced at sign-in.

use serde::{Deserialize, Serialize};
use std::path::Path;
use storage::{PersistedState, PersistenceConfig, PersistenceError};
use thiserror::Error;

/// Schema version of the session document
const SESSION_VERSION: u32 = 1;

/// Session store error types
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Persistence layer error
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionStoreError>;

/// A member as shown in account surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    /// Display username
    pub username: String,
    /// Account email address
    pub email: String,
    /// Human-readable join date
    pub date_joined: String,
}

impl MemberRecord {
    /// The guest placeholder shown when nobody is signed in
    pub fn guest() -> Self {
        Self {
            username: "Guest".to_string(),
            email: "guest@example.com".to_string(),
            date_joined: "—".to_string(),
        }
    }

    /// Whether this record is the guest placeholder
    pub fn is_guest(&self) -> bool {
        *self == Self::guest()
    }
}

/// On-disk session document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
struct StoredSession {
    /// The signed-in member, if any
    member: Option<MemberRecord>,
}

/// Persisted session store
pub struct SessionStore {
    state: PersistedState<StoredSession>,
}

impl SessionStore {
    /// Open a session store at the given path
    ///
    /// A missing file starts a signed-out session.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let config = PersistenceConfig::new(path.as_ref()).version(SESSION_VERSION);

        let state = PersistedState::new(config);
        state.init().await?;

        Ok(Self { state })
    }

    /// The signed-in member, if any
    pub async fn current(&self) -> Result<Option<MemberRecord>> {
        Ok(self.state.get().await?.member)
    }

    /// Record a member as signed in
    pub async fn sign_in(&self, member: MemberRecord) -> Result<()> {
        tracing::info!(username = %member.username, "member signed in");
        self.state.update(|s| s.member = Some(member)).await?;
        Ok(())
    }

    /// Clear the signed-in member
    pub async fn sign_out(&self) -> Result<()> {
        tracing::info!("member signed out");
        self.state.update(|s| s.member = None).await?;
        Ok(())
    }
}
