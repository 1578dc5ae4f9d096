//! Session state management
//!
//! Exposes the persisted session as a reactive query, plus sign-in and
//! sign-out mutations that keep the query cache consistent with the store.

use async_trait::async_trait;
use circely_api::{MemberRecord, SessionStore, SessionStoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::query::{Query, QueryClient, QueryConfig, QueryError, QueryKey};

/// Session state errors
#[derive(Debug, Error)]
pub enum SessionStateError {
    /// Session store operation failed
    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),

    /// Query layer failed
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

/// Result type for session state operations
pub type Result<T> = std::result::Result<T, SessionStateError>;

/// The session as seen by the UI.
///
/// Signed-out sessions carry the guest placeholder so account surfaces always
/// have a member to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentSession {
    /// The member shown in account surfaces
    pub member: MemberRecord,

    /// Whether a real member is signed in
    pub is_signed_in: bool,
}

impl CurrentSession {
    /// The signed-out placeholder session
    pub fn guest() -> Self {
        Self {
            member: MemberRecord::guest(),
            is_signed_in: false,
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Query for the current session
#[derive(Clone)]
pub struct CurrentSessionQuery {
    store: Arc<SessionStore>,
}

impl CurrentSessionQuery {
    /// Create a query over the given store
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Query for CurrentSessionQuery {
    type Data = CurrentSession;

    async fn fetch(&self) -> crate::query::Result<Self::Data> {
        let member = self
            .store
            .current()
            .await
            .map_err(|e| QueryError::FetchError(e.to_string()))?;

        Ok(match member {
            Some(member) => CurrentSession {
                member,
                is_signed_in: true,
            },
            None => CurrentSession::guest(),
        })
    }

    fn key(&self) -> QueryKey {
        QueryKey::new("session", "current")
    }

    fn config(&self) -> QueryConfig {
        QueryConfig {
            // The session only changes through the mutations below, which
            // invalidate and refetch explicitly. A background refetch would
            // race them.
            stale_time: Duration::from_secs(0),
            refetch_on_stale: false,
            retry: false,
            ..Default::default()
        }
    }
}

// ============================================================================
// Mutations
// ============================================================================

/// Signs a member in and refreshes the session query
pub struct SignInMutation {
    store: Arc<SessionStore>,
    query_client: Arc<QueryClient>,
}

impl SignInMutation {
    /// Create the mutation
    pub fn new(store: Arc<SessionStore>, query_client: Arc<QueryClient>) -> Self {
        Self {
            store,
            query_client,
        }
    }

    /// Persist the member, then refetch the session query
    pub async fn execute(&self, member: MemberRecord) -> Result<CurrentSession> {
        self.store.sign_in(member).await?;
        self.query_client.invalidate_scope("session").await?;

        let query = CurrentSessionQuery::new(Arc::clone(&self.store));
        Ok(self.query_client.fetch(&query).await?)
    }
}

/// Signs the member out and refreshes the session query
pub struct SignOutMutation {
    store: Arc<SessionStore>,
    query_client: Arc<QueryClient>,
}

impl SignOutMutation {
    /// Create the mutation
    pub fn new(store: Arc<SessionStore>, query_client: Arc<QueryClient>) -> Self {
        Self {
            store,
            query_client,
        }
    }

    /// Clear the persisted member, then refetch the session query
    pub async fn execute(&self) -> Result<CurrentSession> {
        self.store.sign_out().await?;
        self.query_client.invalidate_scope("session").await?;

        let query = CurrentSessionQuery::new(Arc::clone(&self.store));
        Ok(self.query_client.fetch(&query).await?)
    }
}

// ============================================================================
// Facade
// ============================================================================

/// Facade tying the session store to the query cache.
///
/// Construct once and clone freely; clones share the store and cache.
#[derive(Clone)]
pub struct SessionState {
    store: Arc<SessionStore>,
    query_client: Arc<QueryClient>,
}

impl SessionState {
    /// Create the facade
    pub fn new(store: Arc<SessionStore>, query_client: Arc<QueryClient>) -> Self {
        Self {
            store,
            query_client,
        }
    }

    /// The underlying session store
    pub fn store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.store)
    }

    /// Query for the current session
    pub fn current_session_query(&self) -> CurrentSessionQuery {
        CurrentSessionQuery::new(Arc::clone(&self.store))
    }

    /// Mutation that signs a member in
    pub fn sign_in_mutation(&self) -> SignInMutation {
        SignInMutation::new(Arc::clone(&self.store), Arc::clone(&self.query_client))
    }

    /// Mutation that signs the member out
    pub fn sign_out_mutation(&self) -> SignOutMutation {
        SignOutMutation::new(Arc::clone(&self.store), Arc::clone(&self.query_client))
    }

    /// Get the current session, fetching it if not cached
    pub async fn current_session(&self) -> Result<CurrentSession> {
        let query = self.current_session_query();
        if let Some(session) = self.query_client.get(&query).await? {
            return Ok(session);
        }
        Ok(self.query_client.fetch(&query).await?)
    }

    /// Sign a member in
    pub async fn sign_in(&self, member: MemberRecord) -> Result<CurrentSession> {
        self.sign_in_mutation().execute(member).await
    }

    /// Sign the member out
    pub async fn sign_out(&self) -> Result<CurrentSession> {
        self.sign_out_mutation().execute().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::CacheConfig;
    use tempfile::TempDir;

    async fn test_state() -> (TempDir, SessionState) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"))
            .await
            .unwrap();
        let state = SessionState::new(
            Arc::new(store),
            Arc::new(QueryClient::new(CacheConfig::default())),
        );
        (dir, state)
    }

    fn alex() -> MemberRecord {
        MemberRecord {
            username: "Alex Mercer".to_string(),
            email: "alex@circley.com".to_string(),
            date_joined: "Jan 12, 2024".to_string(),
        }
    }

    #[tokio::test]
    async fn fresh_store_yields_guest_session() {
        let (_dir, state) = test_state().await;

        let session = state.current_session().await.unwrap();
        assert!(!session.is_signed_in);
        assert_eq!(session.member, MemberRecord::guest());
    }

    #[tokio::test]
    async fn sign_in_updates_cached_session() {
        let (_dir, state) = test_state().await;

        // Prime the cache with the guest session.
        let guest = state.current_session().await.unwrap();
        assert!(!guest.is_signed_in);

        let session = state.sign_in(alex()).await.unwrap();
        assert!(session.is_signed_in);
        assert_eq!(session.member.username, "Alex Mercer");

        // The cached read reflects the mutation.
        let current = state.current_session().await.unwrap();
        assert!(current.is_signed_in);
        assert_eq!(current.member.email, "alex@circley.com");
    }

    #[tokio::test]
    async fn sign_out_returns_to_guest() {
        let (_dir, state) = test_state().await;

        state.sign_in(alex()).await.unwrap();
        let session = state.sign_out().await.unwrap();

        assert!(!session.is_signed_in);
        assert_eq!(session.member.username, "Guest");

        let current = state.current_session().await.unwrap();
        assert!(!current.is_signed_in);
    }

    #[tokio::test]
    async fn session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = SessionStore::open(&path).await.unwrap();
            let state = SessionState::new(
                Arc::new(store),
                Arc::new(QueryClient::new(CacheConfig::default())),
            );
            state.sign_in(alex()).await.unwrap();
        }

        let store = SessionStore::open(&path).await.unwrap();
        let state = SessionState::new(
            Arc::new(store),
            Arc::new(QueryClient::new(CacheConfig::default())),
        );

        let session = state.current_session().await.unwrap();
        assert!(session.is_signed_in);
        assert_eq!(session.member.username, "Alex Mercer");
    }

    #[tokio::test]
    async fn standalone_mutations_share_cache() {
        let (_dir, state) = test_state().await;

        let sign_in = state.sign_in_mutation();
        let session = sign_in.execute(alex()).await.unwrap();
        assert!(session.is_signed_in);

        let sign_out = state.sign_out_mutation();
        let session = sign_out.execute().await.unwrap();
        assert!(!session.is_signed_in);
    }
}
