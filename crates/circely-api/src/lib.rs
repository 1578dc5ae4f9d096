//! Circely Service Client
//!
//! This crate provides the HTTP client for the Circely REST endpoints along
//! with the locally persisted session records the client keeps between
//! launches.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod http;
pub mod session;
pub mod types;

pub use account::{AccountApi, AccountClient};
pub use http::{ApiClient, ApiClientConfig, ApiError, ApiRequest, ApiResponse};
pub use session::{MemberRecord, SessionStore, SessionStoreError};
pub use types::{AccountProfile, ChangePasswordParams};
