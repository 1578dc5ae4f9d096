//! Authentication flows for Circely
//!
//! This module provides the simulated sign-in and sign-up flows: form
//! validation with the user-visible message strings, member profile
//! derivation, and the role catalog shown during signup. Successful flows
//! persist the member through the session state facade.

use app_state::{SessionState, SessionStateError};
use circely_api::MemberRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication error types
///
/// The display strings are the inline messages the screens render, so they
/// are part of the user-visible contract.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login submitted without an email or password
    #[error("Please enter your email and password.")]
    MissingCredentials,

    /// Signup submitted with an empty field
    #[error("Please fill out all fields.")]
    IncompleteSignup,

    /// Signup submitted without a selected role
    #[error("Select your role to continue.")]
    RoleNotSelected,

    /// Continue pressed on the role step before choosing a role
    #[error("Pick the option that best describes you.")]
    RoleStepIncomplete,

    /// Password and confirmation differ
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Session state error
    #[error("Session error: {0}")]
    Session(#[from] SessionStateError),
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// `date_joined` value stamped on freshly created members
const JOINED_TODAY: &str = "Today";

// =============================================================================
// Roles
// =============================================================================

/// Member role selected during signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Someone looking for help with their own recovery
    Seeker,
    /// A business or institution bringing Circely to its people
    Organization,
    /// A sponsor mentoring other members
    Sponsor,
    /// A healthcare professional
    Provider,
}

impl MemberRole {
    /// All roles in the order the signup screen offers them
    pub const ALL: [MemberRole; 4] = [
        MemberRole::Seeker,
        MemberRole::Organization,
        MemberRole::Sponsor,
        MemberRole::Provider,
    ];

    /// Stable identifier
    pub fn id(&self) -> &'static str {
        match self {
            MemberRole::Seeker => "seeker",
            MemberRole::Organization => "organization",
            MemberRole::Sponsor => "sponsor",
            MemberRole::Provider => "provider",
        }
    }

    /// Card label on the role step
    pub fn label(&self) -> &'static str {
        match self {
            MemberRole::Seeker => "Looking for Help",
            MemberRole::Organization => "Business or Institution",
            MemberRole::Sponsor => "Sponsor",
            MemberRole::Provider => "Healthcare Professional",
        }
    }

    /// Card description on the role step
    pub fn description(&self) -> &'static str {
        match self {
            MemberRole::Seeker => {
                "Guided support, meetings, and a gentle start to recovery."
            }
            MemberRole::Organization => {
                "Bring Circley to your teams, members, or community programs."
            }
            MemberRole::Sponsor => {
                "Match with people you can mentor and keep them accountable."
            }
            MemberRole::Provider => {
                "Share expertise, host groups, and collaborate on care plans."
            }
        }
    }

    /// Accent color of the role card
    pub fn accent(&self) -> &'static str {
        match self {
            MemberRole::Seeker => "#2563eb",
            MemberRole::Organization => "#0ea5e9",
            MemberRole::Sponsor => "#22c55e",
            MemberRole::Provider => "#f97316",
        }
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Signup form fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupParams {
    /// Role chosen on the first step
    pub role: Option<MemberRole>,
    /// Work or personal email
    pub email: String,
    /// Chosen password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
}

/// Derive a display username from an email address
///
/// The local part before `@` becomes the username; an empty email falls
/// back to "Member".
pub fn derive_username(email: &str) -> String {
    if email.is_empty() {
        "Member".to_string()
    } else {
        email.split('@').next().unwrap_or("Member").to_string()
    }
}

/// The demo member the client seeds its session with
pub fn demo_member() -> MemberRecord {
    MemberRecord {
        username: "Alex Mercer".to_string(),
        email: "alex@circley.com".to_string(),
        date_joined: "Jan 12, 2024".to_string(),
    }
}

// =============================================================================
// Service
// =============================================================================

/// Authentication service
///
/// Validates the login and signup forms and drives the session state. The
/// flows are simulated: any non-empty credentials are accepted and the
/// member profile is derived from the email.
///
/// # Example
///
/// ```rust,no_run
/// use app_core::auth::AuthService;
/// use app_state::{QueryClient, SessionState};
/// use circely_api::SessionStore;
/// use std::sync::Arc;
/// use storage::CacheConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(SessionStore::open("session.json").await?);
///     let query_client = Arc::new(QueryClient::new(CacheConfig::default()));
///     let auth = AuthService::new(SessionState::new(store, query_client));
///
///     let member = auth.sign_in("alex@circley.com", "password123").await?;
///     println!("Signed in as {}", member.username);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AuthService {
    session: SessionState,
}

impl AuthService {
    /// Create the service over a session state facade
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }

    /// The session state facade
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Validate the role-selection step of signup
    ///
    /// # Errors
    ///
    /// - `AuthError::RoleStepIncomplete` - no role was chosen
    pub fn validate_role_step(role: Option<MemberRole>) -> Result<MemberRole> {
        role.ok_or(AuthError::RoleStepIncomplete)
    }

    /// Sign in with an email and password
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingCredentials` - email or password is empty
    /// - `AuthError::Session` - the session could not be persisted
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<MemberRecord> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let member = MemberRecord {
            username: derive_username(email),
            email: email.to_string(),
            date_joined: JOINED_TODAY.to_string(),
        };
        self.session.sign_in(member.clone()).await?;

        tracing::info!(username = %member.username, "member signed in");
        Ok(member)
    }

    /// Create an account and sign the new member in
    ///
    /// Validation order matches the form: empty fields, then the missing
    /// role, then the password mismatch.
    ///
    /// # Errors
    ///
    /// - `AuthError::IncompleteSignup` - a field is empty
    /// - `AuthError::RoleNotSelected` - no role was chosen
    /// - `AuthError::PasswordMismatch` - passwords differ
    /// - `AuthError::Session` - the session could not be persisted
    pub async fn sign_up(&self, params: SignupParams) -> Result<MemberRecord> {
        if params.email.is_empty()
            || params.password.is_empty()
            || params.confirm_password.is_empty()
        {
            return Err(AuthError::IncompleteSignup);
        }
        let role = params.role.ok_or(AuthError::RoleNotSelected)?;
        if params.password != params.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let member = MemberRecord {
            username: derive_username(&params.email),
            email: params.email.clone(),
            date_joined: JOINED_TODAY.to_string(),
        };
        self.session.sign_in(member.clone()).await?;

        tracing::info!(
            username = %member.username,
            role = role.id(),
            "member signed up"
        );
        Ok(member)
    }

    /// Sign the current member out, returning to the guest session
    pub async fn sign_out(&self) -> Result<()> {
        self.session.sign_out().await?;
        tracing::info!("member signed out");
        Ok(())
    }
}
