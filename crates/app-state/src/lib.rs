//! # App State
//!
//! Reactive state management for the Circely client.
//!
//! This crate provides the state layer between the service client and the
//! UI: cached queries with staleness tracking, mutations with optimistic
//! updates and rollback, the current-session facade, and the emergency
//! overlay channel.
//!
//! ## Architecture
//!
//! - **Queries** ([`query`]): cached reads with background refetch
//! - **Mutations** ([`mutation`]): writes with optimistic updates and cache
//!   invalidation
//! - **Session** ([`session`]): the signed-in member as a reactive query
//! - **SOS** ([`sos`]): open/closed state for the emergency support overlay

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mutation;
pub mod query;
pub mod session;
pub mod sos;

pub use mutation::{
    Mutation, MutationClient, MutationConfig, MutationError, MutationState,
};
pub use query::{Query, QueryClient, QueryConfig, QueryError, QueryKey, QueryState};
pub use session::{CurrentSession, SessionState, SessionStateError};
pub use sos::{SosChannel, SosEvent};
