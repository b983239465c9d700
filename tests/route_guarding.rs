//! Route guarding integration tests
//!
//! Drives a real `SessionState` through sign-in, profile resolution and
//! sign-out, checking what the route guard decides at each step.

use async_trait::async_trait;
use lido::app::AppConfig;
use lido::session::{
    AuthBackend, AuthBackendError, AuthEvent, AuthUser, Credentials, ProfileLoader, ProfileStore,
    Role, SessionState, SignUpParams, StoreError, UserMetadata, UserProfile,
};
use lido::ui::{GuardDecision, Route, RouteGuard, Router};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct InMemoryAuth {
    user: Mutex<Option<AuthUser>>,
}

#[async_trait]
impl AuthBackend for InMemoryAuth {
    async fn current_user(&self) -> Result<Option<AuthUser>, AuthBackendError> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthBackendError> {
        let user = AuthUser {
            id: format!("id-{}", credentials.email),
            email: Some(credentials.email.clone()),
            metadata: UserMetadata::default(),
        };
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(&self, _params: &SignUpParams) -> Result<AuthUser, AuthBackendError> {
        Err(AuthBackendError::Rejected("sign-ups closed".to_string()))
    }

    async fn sign_out(&self) -> Result<(), AuthBackendError> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

/// Store whose records become visible after a number of reads
struct LaggingStore {
    role: Role,
    hidden_reads: usize,
    reads: AtomicUsize,
}

#[async_trait]
impl ProfileStore for LaggingStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        if read < self.hidden_reads {
            return Err(StoreError::NotYetVisible);
        }
        Ok(UserProfile {
            id: user_id.to_string(),
            name: "Admin".to_string(),
            avatar_url: String::new(),
            role: self.role,
            bio: None,
            status: Some("active".to_string()),
        })
    }
}

fn session(
    role: Role,
    hidden_reads: usize,
    config: &AppConfig,
) -> (SessionState, Arc<LaggingStore>) {
    let store = Arc::new(LaggingStore {
        role,
        hidden_reads,
        reads: AtomicUsize::new(0),
    });
    let auth = Arc::new(InMemoryAuth {
        user: Mutex::new(None),
    });
    let loader = ProfileLoader::new(store.clone(), config.retry_policy());
    (SessionState::new(auth, loader), store)
}

fn credentials() -> Credentials {
    Credentials {
        email: "root@lido.education".to_string(),
        password: "secret".to_string(),
    }
}

#[tokio::test]
async fn test_guard_follows_session_lifecycle() {
    let (state, _) = session(Role::Admin, 0, &AppConfig::default());
    let router = Router::new();
    let admin = router.match_path("#/admin");

    // Before the initial session check completes
    assert_eq!(
        RouteGuard::evaluate(&admin, &state.snapshot().await),
        GuardDecision::ShowLoading
    );

    let snapshot = state.initialize().await;
    assert_eq!(
        RouteGuard::evaluate(&admin, &snapshot),
        GuardDecision::Redirect(Route::Login)
    );
    assert_eq!(
        RouteGuard::evaluate(&Route::Login, &snapshot),
        GuardDecision::Render
    );

    state.login(&credentials()).await.unwrap();
    let snapshot = state.snapshot().await;
    assert_eq!(RouteGuard::evaluate(&admin, &snapshot), GuardDecision::Render);
    assert_eq!(
        RouteGuard::evaluate(&Route::Login, &snapshot),
        GuardDecision::Redirect(Route::Landing)
    );

    state.logout().await.unwrap();
    assert_eq!(
        RouteGuard::evaluate(&Route::Dashboard, &state.snapshot().await),
        GuardDecision::Redirect(Route::Login)
    );
}

#[tokio::test(start_paused = true)]
async fn test_profile_visible_after_retries() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "profile_retry": {{ "retries": 2, "delay_ms": 500 }} }}"#).unwrap();
    let config = AppConfig::load(file.path()).await.unwrap();

    let (state, store) = session(Role::Admin, 2, &config);
    let started = tokio::time::Instant::now();
    let profile = state.login(&credentials()).await.unwrap();

    assert_eq!(profile.role, Role::Admin);
    assert_eq!(store.reads.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(
        RouteGuard::evaluate(&Route::Admin, &state.snapshot().await),
        GuardDecision::Render
    );
}

#[tokio::test(start_paused = true)]
async fn test_fallback_profile_is_not_admin() {
    let (state, _) = session(Role::Admin, usize::MAX, &AppConfig::default());
    let profile = state.login(&credentials()).await.unwrap();

    assert_eq!(profile.name, "root");
    assert_eq!(profile.role, Role::Student);
    assert_eq!(
        RouteGuard::evaluate(&Route::Admin, &state.snapshot().await),
        GuardDecision::Redirect(Route::Dashboard)
    );
}

#[tokio::test]
async fn test_session_without_profile_shows_loading() {
    let (state, _) = session(Role::Student, 0, &AppConfig::default());
    let user = AuthUser {
        id: "u1".to_string(),
        email: None,
        metadata: UserMetadata::default(),
    };

    let snapshot = state.handle_event(AuthEvent::PasswordRecovery(user)).await;
    assert_eq!(
        RouteGuard::evaluate(&Route::Library, &snapshot),
        GuardDecision::ShowLoading
    );
    assert_eq!(
        RouteGuard::evaluate(&Route::Courses, &snapshot),
        GuardDecision::Render
    );
}

#[tokio::test]
async fn test_rejected_sign_up_keeps_visitor_signed_out() {
    let (state, _) = session(Role::Student, 0, &AppConfig::default());
    state.initialize().await;

    let result = state
        .sign_up(&SignUpParams::new("new@lido.education", "secret", "New"))
        .await;
    assert!(result.is_err());
    assert_eq!(
        RouteGuard::evaluate(&Route::Login, &state.snapshot().await),
        GuardDecision::Render
    );
}
