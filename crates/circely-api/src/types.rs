//! Shared data types for the Circely endpoints

use serde::{Deserialize, Serialize};

/// Account profile returned by the account query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// Display username
    pub username: String,
    /// Account email address
    pub email: String,
    /// Human-readable join date (e.g., "Jan 12, 2024")
    pub date_joined: String,
}

/// Parameters for the change-password procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordParams {
    /// Current password
    pub old_password: String,
    /// New password
    pub new_password: String,
    /// Confirmation of the new password
    pub confirm_password: String,
}
