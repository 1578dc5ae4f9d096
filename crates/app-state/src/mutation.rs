//! Mutation management
//!
//! This module provides mutation handling with optimistic updates, rollback on
//! failure, and automatic cache invalidation.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::query::{QueryClient, QueryKey};

/// Mutation errors
#[derive(Debug, Error)]
pub enum MutationError {
    /// Mutation execution failed
    #[error("Mutation failed: {0}")]
    ExecutionError(String),

    /// Optimistic update failed
    #[error("Optimistic update failed: {0}")]
    OptimisticError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for mutation operations
pub type Result<T> = std::result::Result<T, MutationError>;

/// Mutation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Mutation is idle
    Idle,

    /// Mutation is pending (optimistic update applied)
    Pending,

    /// Mutation succeeded
    Success,

    /// Mutation failed (rolled back)
    Error,
}

/// Optimistic update for rollback
#[derive(Debug, Clone)]
struct OptimisticUpdate {
    /// The query key that was updated
    query_key: QueryKey,

    /// Previous value (for rollback)
    #[allow(dead_code)]
    previous_value: Option<String>,

    /// When the update was applied
    #[allow(dead_code)]
    applied_at: SystemTime,
}

/// Mutation context for tracking optimistic updates
#[derive(Debug, Clone)]
pub struct MutationContext {
    updates: Vec<OptimisticUpdate>,
}

impl MutationContext {
    /// Create a new mutation context
    pub fn new() -> Self {
        Self { updates: Vec::new() }
    }

    /// Record an optimistic update
    pub fn record_update(&mut self, key: QueryKey, previous_value: Option<String>) {
        self.updates.push(OptimisticUpdate {
            query_key: key,
            previous_value,
            applied_at: SystemTime::now(),
        });
    }
}

impl Default for MutationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutation configuration
#[derive(Debug, Clone, Default)]
pub struct MutationConfig {
    /// Scopes to invalidate after success
    pub invalidate_scopes: Vec<String>,

    /// Specific queries to invalidate after success
    pub invalidate_keys: Vec<QueryKey>,
}

/// Mutation trait for defining data modification logic
#[async_trait]
pub trait Mutation: Send + Sync {
    /// Input type for the mutation
    type Input: Send + Sync;

    /// Output type returned by the mutation
    type Output: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Execute the mutation
    async fn mutate(&self, input: Self::Input) -> Result<Self::Output>;

    /// Apply optimistic update before mutation completes
    ///
    /// This is called before the mutation executes, allowing the UI to update
    /// immediately. Record every touched query key in the context so a failed
    /// mutation can roll them back.
    async fn optimistic_update(
        &self,
        _input: &Self::Input,
        _ctx: &mut MutationContext,
    ) -> Result<()> {
        Ok(())
    }

    /// Get mutation configuration
    fn config(&self) -> MutationConfig {
        MutationConfig::default()
    }
}

/// Mutation client for managing mutations
pub struct MutationClient {
    query_client: Arc<QueryClient>,
    state: Arc<RwLock<HashMap<String, MutationState>>>,
    pending_contexts: Arc<Mutex<HashMap<String, MutationContext>>>,
}

impl MutationClient {
    /// Create a new mutation client
    pub fn new(query_client: Arc<QueryClient>) -> Self {
        Self {
            query_client,
            state: Arc::new(RwLock::new(HashMap::new())),
            pending_contexts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Execute a mutation with optimistic updates
    pub async fn mutate<M: Mutation>(
        &self,
        mutation: &M,
        input: M::Input,
        mutation_id: impl Into<String>,
    ) -> Result<M::Output> {
        let id = mutation_id.into();
        let config = mutation.config();

        // Set state to pending
        {
            let mut state = self.state.write().await;
            state.insert(id.clone(), MutationState::Pending);
        }

        // Apply optimistic update
        let mut ctx = MutationContext::new();
        if let Err(e) = mutation.optimistic_update(&input, &mut ctx).await {
            // Optimistic update failed, revert to idle
            let mut state = self.state.write().await;
            state.insert(id.clone(), MutationState::Idle);
            return Err(e);
        }

        // Store context for potential rollback
        {
            let mut contexts = self.pending_contexts.lock().await;
            contexts.insert(id.clone(), ctx);
        }

        let result = mutation.mutate(input).await;

        match result {
            Ok(output) => {
                {
                    let mut state = self.state.write().await;
                    state.insert(id.clone(), MutationState::Success);
                }

                {
                    let mut contexts = self.pending_contexts.lock().await;
                    contexts.remove(&id);
                }

                // Invalidate caches as specified
                for scope in &config.invalidate_scopes {
                    let _ = self.query_client.invalidate_scope(scope).await;
                }

                for key in &config.invalidate_keys {
                    let _ = self.query_client.invalidate(key).await;
                }

                Ok(output)
            }
            Err(e) => {
                {
                    let mut state = self.state.write().await;
                    state.insert(id.clone(), MutationState::Error);
                }

                self.rollback(&id).await;

                Err(e)
            }
        }
    }

    /// Rollback optimistic updates for a mutation
    ///
    /// Touched queries are re-invalidated in reverse order so dependent reads
    /// go back through their fetchers.
    async fn rollback(&self, mutation_id: &str) {
        let ctx = {
            let mut contexts = self.pending_contexts.lock().await;
            contexts.remove(mutation_id)
        };

        if let Some(ctx) = ctx {
            for update in ctx.updates.iter().rev() {
                if let Err(error) = self.query_client.invalidate(&update.query_key).await {
                    tracing::error!(
                        key = %update.query_key.to_cache_key(),
                        %error,
                        "rollback invalidation failed"
                    );
                }
            }
        }
    }

    /// Get mutation state
    pub async fn state(&self, mutation_id: &str) -> MutationState {
        let state = self.state.read().await;
        state
            .get(mutation_id)
            .copied()
            .unwrap_or(MutationState::Idle)
    }

    /// Reset mutation state
    pub async fn reset(&self, mutation_id: &str) {
        let mut state = self.state.write().await;
        state.remove(mutation_id);

        let mut contexts = self.pending_contexts.lock().await;
        contexts.remove(mutation_id);
    }

    /// Clear all mutation states
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.clear();

        let mut contexts = self.pending_contexts.lock().await;
        contexts.clear();
    }
}

impl Clone for MutationClient {
    fn clone(&self) -> Self {
        Self {
            query_client: Arc::clone(&self.query_client),
            state: Arc::clone(&self.state),
            pending_contexts: Arc::clone(&self.pending_contexts),
        }
    }
}
