//! Session and profile state
//!
//! This module owns the client-side view of authentication: whether the
//! initial session check is still pending, whether the backend reports a
//! session, and the profile of the signed-in user.
//!
//! Profiles are read from an external store that may not expose a freshly
//! created record right after sign-in, so [`ProfileLoader`] retries that one
//! case with a fixed delay. When no profile can be read at all, a fallback is
//! derived from the auth user's metadata so the app stays usable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors reported by the authentication backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthBackendError {
    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The backend refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Errors reported by the profile store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record exists but is not visible yet (typical right after sign-up)
    #[error("Profile not visible yet")]
    NotYetVisible,

    /// The store's row-level access policy recursed on itself
    #[error("Profile access policy recursion")]
    PolicyRecursion,

    /// Any other store failure
    #[error("Store error: {0}")]
    Backend(String),
}

/// Session-related errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Authentication backend error
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthBackendError),

    /// No current session
    #[error("No current session")]
    NoSession,
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// User role on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Learner
    #[default]
    Student,
    /// Course author
    Creator,
    /// Platform administrator
    Admin,
}

impl Role {
    /// Get the role as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Creator => "creator",
            Role::Admin => "admin",
        }
    }

    /// Check if this is the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Check if this role may author courses
    pub fn can_create_courses(&self) -> bool {
        matches!(self, Role::Creator | Role::Admin)
    }
}

/// Profile record of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// Platform role
    #[serde(default)]
    pub role: Role,
    /// Short biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Account status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Metadata attached to the auth user at sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Name given at sign-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Role given at sign-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// User as known to the authentication backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID
    pub id: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Sign-up metadata
    #[serde(default, rename = "user_metadata")]
    pub metadata: UserMetadata,
}

/// Email/password credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Account creation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpParams {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Display name
    pub name: String,
    /// Role stored in the new account's metadata
    pub role: Role,
}

impl SignUpParams {
    /// Create sign-up parameters; new accounts are always students
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            role: Role::Student,
        }
    }
}

/// Authentication backend
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// User of the persisted session, if any
    async fn current_user(&self) -> std::result::Result<Option<AuthUser>, AuthBackendError>;

    /// Sign in with email and password
    async fn sign_in(&self, credentials: &Credentials)
        -> std::result::Result<AuthUser, AuthBackendError>;

    /// Create an account
    async fn sign_up(&self, params: &SignUpParams)
        -> std::result::Result<AuthUser, AuthBackendError>;

    /// End the session
    async fn sign_out(&self) -> std::result::Result<(), AuthBackendError>;
}

/// Store holding profile records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile of `user_id`
    async fn fetch_profile(&self, user_id: &str) -> std::result::Result<UserProfile, StoreError>;
}

/// Fixed-delay retry for profiles that are not visible yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Delay before each extra attempt
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_secs(1),
        }
    }
}

/// Loads profiles, retrying records that are not visible yet
#[derive(Clone)]
pub struct ProfileLoader {
    store: Arc<dyn ProfileStore>,
    policy: RetryPolicy,
}

impl ProfileLoader {
    /// Create a new profile loader
    pub fn new(store: Arc<dyn ProfileStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// The retry policy in use
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Load a profile
    ///
    /// Returns `None` when the store cannot provide one; callers fall back to
    /// [`fallback_profile`].
    pub async fn load(&self, user_id: &str) -> Option<UserProfile> {
        let mut remaining = self.policy.retries;

        loop {
            match self.store.fetch_profile(user_id).await {
                Ok(profile) => return Some(profile),
                Err(StoreError::NotYetVisible) if remaining > 0 => {
                    remaining -= 1;
                    tracing::debug!(user_id, remaining, "profile not visible yet, retrying");
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(StoreError::PolicyRecursion) => {
                    tracing::warn!(user_id, "profile policy recursion, using fallback profile");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        user_id,
                        error = %e,
                        "profile fetch failed, using fallback profile"
                    );
                    return None;
                }
            }
        }
    }
}

/// Profile derived from auth metadata when the store has none
pub fn fallback_profile(user: &AuthUser) -> UserProfile {
    let email = user.email.as_deref().unwrap_or_default();

    let name = user
        .metadata
        .name
        .clone()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            email
                .split('@')
                .next()
                .filter(|local| !local.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Usuário".to_string());

    let avatar_url = user
        .metadata
        .avatar_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| {
            format!(
                "https://ui-avatars.com/api/?name={}&background=0071e3&color=fff",
                email
            )
        });

    UserProfile {
        id: user.id.clone(),
        name,
        avatar_url,
        role: user.metadata.role.unwrap_or_default(),
        bio: None,
        status: Some("active".to_string()),
    }
}

/// Point-in-time view of the session, as read by route guards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    /// A session check is in flight
    pub loading: bool,
    /// The backend reports a session
    pub has_session: bool,
    /// Profile of the signed-in user, once resolved
    pub user: Option<UserProfile>,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            has_session: false,
            user: None,
        }
    }
}

impl AuthSnapshot {
    /// Snapshot of a resolved session without a user
    pub fn signed_out() -> Self {
        Self {
            loading: false,
            has_session: false,
            user: None,
        }
    }

    /// Snapshot of a resolved session with a loaded profile
    pub fn signed_in(user: UserProfile) -> Self {
        Self {
            loading: false,
            has_session: true,
            user: Some(user),
        }
    }

    /// Check if there is a session
    pub fn is_authenticated(&self) -> bool {
        self.has_session
    }

    /// Role of the signed-in user
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}

/// Auth state change pushed by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Session restored at startup
    InitialSession(Option<AuthUser>),
    /// User signed in
    SignedIn(AuthUser),
    /// Access token refreshed
    TokenRefreshed(AuthUser),
    /// User record changed
    UserUpdated(AuthUser),
    /// Password recovery link opened
    PasswordRecovery(AuthUser),
    /// Session ended
    SignedOut,
}

impl AuthEvent {
    /// User carried by the event's session
    pub fn session_user(&self) -> Option<&AuthUser> {
        match self {
            AuthEvent::InitialSession(user) => user.as_ref(),
            AuthEvent::SignedIn(user)
            | AuthEvent::TokenRefreshed(user)
            | AuthEvent::UserUpdated(user)
            | AuthEvent::PasswordRecovery(user) => Some(user),
            AuthEvent::SignedOut => None,
        }
    }

    /// Whether the profile must be reloaded
    pub fn requires_resync(&self) -> bool {
        matches!(
            self,
            AuthEvent::SignedIn(_) | AuthEvent::TokenRefreshed(_) | AuthEvent::UserUpdated(_)
        )
    }
}

/// Session state manager
///
/// Cheap to clone; clones share the same snapshot.
#[derive(Clone)]
pub struct SessionState {
    backend: Arc<dyn AuthBackend>,
    profiles: ProfileLoader,
    snapshot: Arc<RwLock<AuthSnapshot>>,
}

impl SessionState {
    /// Create a new session state manager
    ///
    /// The snapshot starts in the loading state until [`initialize`](Self::initialize)
    /// or the first [`AuthEvent`] resolves it.
    pub fn new(backend: Arc<dyn AuthBackend>, profiles: ProfileLoader) -> Self {
        Self {
            backend,
            profiles,
            snapshot: Arc::new(RwLock::new(AuthSnapshot::default())),
        }
    }

    /// Get a copy of the current snapshot
    pub async fn snapshot(&self) -> AuthSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Restore the persisted session at startup
    ///
    /// Backend failures are logged and leave the app signed out.
    pub async fn initialize(&self) -> AuthSnapshot {
        self.snapshot.write().await.loading = true;

        match self.backend.current_user().await {
            Ok(Some(user)) => {
                self.snapshot.write().await.has_session = true;
                self.sync_user(&user).await;
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Auth initialization failed: {}", e),
        }

        let mut snapshot = self.snapshot.write().await;
        snapshot.loading = false;
        snapshot.clone()
    }

    /// Apply an auth state change
    pub async fn handle_event(&self, event: AuthEvent) -> AuthSnapshot {
        match event.session_user() {
            Some(user) => {
                self.snapshot.write().await.has_session = true;
                if event.requires_resync() {
                    self.sync_user(user).await;
                }
            }
            None => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.has_session = false;
                snapshot.user = None;
            }
        }

        let mut snapshot = self.snapshot.write().await;
        snapshot.loading = false;
        snapshot.clone()
    }

    /// Sign in and load the user's profile
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        let user = self.backend.sign_in(credentials).await?;
        self.snapshot.write().await.has_session = true;
        Ok(self.sync_user(&user).await)
    }

    /// Create an account and load its profile
    pub async fn sign_up(&self, params: &SignUpParams) -> Result<UserProfile> {
        let user = self.backend.sign_up(params).await?;
        self.snapshot.write().await.has_session = true;
        Ok(self.sync_user(&user).await)
    }

    /// End the session
    ///
    /// Local state is cleared even when the backend call fails.
    pub async fn logout(&self) -> Result<()> {
        self.snapshot.write().await.loading = true;
        let result = self.backend.sign_out().await;

        *self.snapshot.write().await = AuthSnapshot::signed_out();
        result.map_err(SessionError::from)
    }

    /// Reload the signed-in user's profile
    pub async fn refresh_profile(&self) -> Result<UserProfile> {
        let user = self
            .backend
            .current_user()
            .await?
            .ok_or(SessionError::NoSession)?;
        Ok(self.sync_user(&user).await)
    }

    /// Load the profile for `user` (or its fallback) into the snapshot
    async fn sync_user(&self, user: &AuthUser) -> UserProfile {
        let profile = match self.profiles.load(&user.id).await {
            Some(profile) => profile,
            None => fallback_profile(user),
        };
        self.snapshot.write().await.user = Some(profile.clone());
        profile
    }
}
