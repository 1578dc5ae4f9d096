//! Typed account operations
//!
//! Thin facade over [`ApiClient`] for the account endpoints. The operations
//! are exposed through the [`AccountApi`] trait so higher layers can swap in
//! mock implementations.

use crate::http::{ApiClient, ApiError, ApiRequest};
use crate::types::{AccountProfile, ChangePasswordParams};
use async_trait::async_trait;

/// Path of the account profile query
const ACCOUNT_PATH: &str = "/api/account/";

/// Path of the change-password procedure
const PASSWORD_PATH: &str = "/api/account/password/";

/// Retries applied to the profile query
const PROFILE_RETRIES: usize = 2;

/// Account operations exposed by the Circely service
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch the signed-in member's profile
    async fn fetch_profile(&self) -> Result<AccountProfile, ApiError>;

    /// Change the signed-in member's password
    async fn change_password(&self, params: &ChangePasswordParams) -> Result<(), ApiError>;
}

/// HTTP-backed implementation of [`AccountApi`]
#[derive(Debug, Clone)]
pub struct AccountClient {
    client: ApiClient,
}

impl AccountClient {
    /// Create a new account client
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountApi for AccountClient {
    async fn fetch_profile(&self) -> Result<AccountProfile, ApiError> {
        let request = ApiRequest::query(ACCOUNT_PATH);
        let response = self
            .client
            .query_with_retry::<AccountProfile>(request, PROFILE_RETRIES)
            .await?;

        Ok(response.data)
    }

    /// The procedure is not retried: a password change is not idempotent.
    async fn change_password(&self, params: &ChangePasswordParams) -> Result<(), ApiError> {
        let request = ApiRequest::procedure(PASSWORD_PATH).json_body(params).map_err(|e| {
            ApiError::new(0, "SerializationError", format!("Failed to encode body: {}", e))
        })?;

        self.client.procedure_empty(request).await?;

        tracing::debug!("password change accepted");
        Ok(())
    }
}
