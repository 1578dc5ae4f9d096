//! Account service
//!
//! Profile refresh and password changes over the REST client. The service
//! owns the message strings the account screen renders, including the
//! fallback used when the backend gives no usable error message.

use circely_api::{AccountApi, AccountProfile, ApiError, ChangePasswordParams, MemberRecord};
use std::sync::Arc;
use thiserror::Error;

/// Status message shown after a successful password change
pub const PASSWORD_UPDATED: &str = "Password updated successfully";

/// Fallback message when the backend gives no usable error message
const PASSWORD_UPDATE_FAILED: &str = "Failed to update password";

/// Account service error types
#[derive(Debug, Error)]
pub enum AccountError {
    /// New password and confirmation differ; caught before any request
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password change rejected; the message is ready for display
    #[error("{0}")]
    UpdateFailed(String),

    /// Profile request failed
    #[error("Account request failed: {0}")]
    Api(#[from] ApiError),
}

/// Result type for account operations
pub type Result<T> = std::result::Result<T, AccountError>;

/// Account service over the Circely REST endpoints
#[derive(Clone)]
pub struct AccountService {
    api: Arc<dyn AccountApi>,
}

impl AccountService {
    /// Create the service over any [`AccountApi`] implementation
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self { api }
    }

    /// Fetch the member profile from the backend
    pub async fn profile(&self) -> Result<MemberRecord> {
        let profile = self.api.fetch_profile().await?;
        Ok(member_from_profile(profile))
    }

    /// Refresh the profile, keeping the current one when the fetch fails
    ///
    /// The account screen shows whatever it already has rather than erroring
    /// out, so a failed refresh only logs.
    pub async fn refresh_profile(&self, current: &MemberRecord) -> MemberRecord {
        match self.profile().await {
            Ok(member) => member,
            Err(error) => {
                tracing::debug!(%error, "profile refresh failed, keeping current profile");
                current.clone()
            }
        }
    }

    /// Change the member's password
    ///
    /// The mismatch check runs before any request is made. A rejected change
    /// surfaces the backend's message verbatim when it produced one, and the
    /// generic fallback otherwise.
    ///
    /// # Errors
    ///
    /// - `AccountError::PasswordMismatch` - confirmation differs
    /// - `AccountError::UpdateFailed` - the backend rejected the change
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        if new_password != confirm_password {
            return Err(AccountError::PasswordMismatch);
        }

        let params = ChangePasswordParams {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        };

        match self.api.change_password(&params).await {
            Ok(()) => Ok(()),
            Err(error) => Err(AccountError::UpdateFailed(
                server_message(&error)
                    .unwrap_or(PASSWORD_UPDATE_FAILED)
                    .to_string(),
            )),
        }
    }
}

fn member_from_profile(profile: AccountProfile) -> MemberRecord {
    MemberRecord {
        username: profile.username,
        email: profile.email,
        date_joined: profile.date_joined,
    }
}

/// The backend's display message, when it actually produced one
///
/// Status 0 marks transport-level failures and the "Unknown" code marks
/// bodies that never parsed; neither carries a message meant for users.
fn server_message(error: &ApiError) -> Option<&str> {
    if error.status() == 0 || error.error() == "Unknown" || error.message().is_empty() {
        None
    } else {
        Some(error.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    mockall::mock! {
        pub Api {}

        #[async_trait]
        impl AccountApi for Api {
            async fn fetch_profile(&self) -> std::result::Result<AccountProfile, ApiError>;
            async fn change_password(
                &self,
                params: &ChangePasswordParams,
            ) -> std::result::Result<(), ApiError>;
        }
    }

    fn alex_profile() -> AccountProfile {
        AccountProfile {
            username: "Alex Mercer".to_string(),
            email: "alex@circley.com".to_string(),
            date_joined: "Jan 12, 2024".to_string(),
        }
    }

    #[tokio::test]
    async fn profile_maps_to_member_record() {
        let mut mock = MockApi::new();
        mock.expect_fetch_profile().returning(|| Ok(alex_profile()));

        let service = AccountService::new(Arc::new(mock));
        let member = service.profile().await.unwrap();

        assert_eq!(member.username, "Alex Mercer");
        assert_eq!(member.email, "alex@circley.com");
        assert_eq!(member.date_joined, "Jan 12, 2024");
    }

    #[tokio::test]
    async fn refresh_keeps_current_profile_on_error() {
        let mut mock = MockApi::new();
        mock.expect_fetch_profile()
            .returning(|| Err(ApiError::new(503, "ServiceUnavailable", "down")));

        let service = AccountService::new(Arc::new(mock));
        let current = MemberRecord {
            username: "jordan".to_string(),
            email: "jordan@circley.com".to_string(),
            date_joined: "Today".to_string(),
        };

        let refreshed = service.refresh_profile(&current).await;
        assert_eq!(refreshed, current);
    }

    #[tokio::test]
    async fn refresh_replaces_profile_on_success() {
        let mut mock = MockApi::new();
        mock.expect_fetch_profile().returning(|| Ok(alex_profile()));

        let service = AccountService::new(Arc::new(mock));
        let current = MemberRecord::guest();

        let refreshed = service.refresh_profile(&current).await;
        assert_eq!(refreshed.username, "Alex Mercer");
    }

    #[tokio::test]
    async fn mismatch_is_caught_before_any_request() {
        let mut mock = MockApi::new();
        mock.expect_change_password().times(0);

        let service = AccountService::new(Arc::new(mock));
        let err = service
            .change_password("old-pw", "new-pw", "other-pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[tokio::test]
    async fn change_password_success() {
        let mut mock = MockApi::new();
        mock.expect_change_password()
            .withf(|params| {
                params.old_password == "old-pw"
                    && params.new_password == "new-pw"
                    && params.confirm_password == "new-pw"
            })
            .returning(|_| Ok(()));

        let service = AccountService::new(Arc::new(mock));
        service
            .change_password("old-pw", "new-pw", "new-pw")
            .await
            .unwrap();

        assert_eq!(PASSWORD_UPDATED, "Password updated successfully");
    }

    #[tokio::test]
    async fn rejection_surfaces_backend_message() {
        let mut mock = MockApi::new();
        mock.expect_change_password().returning(|_| {
            Err(ApiError::new(
                400,
                "InvalidRequest",
                "Current password is incorrect",
            ))
        });

        let service = AccountService::new(Arc::new(mock));
        let err = service
            .change_password("old-pw", "new-pw", "new-pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Current password is incorrect");
    }

    #[tokio::test]
    async fn transport_failure_uses_fallback_message() {
        let mut mock = MockApi::new();
        mock.expect_change_password().returning(|_| {
            Err(ApiError::new(
                0,
                "NetworkError",
                "Request failed: connection refused",
            ))
        });

        let service = AccountService::new(Arc::new(mock));
        let err = service
            .change_password("old-pw", "new-pw", "new-pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to update password");
    }

    #[tokio::test]
    async fn unparsed_body_uses_fallback_message() {
        let mut mock = MockApi::new();
        mock.expect_change_password()
            .returning(|_| Err(ApiError::new(500, "Unknown", "HTTP 500: <html>")));

        let service = AccountService::new(Arc::new(mock));
        let err = service
            .change_password("old-pw", "new-pw", "new-pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to update password");
    }
}
