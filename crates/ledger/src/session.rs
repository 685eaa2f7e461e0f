//! Session tracking.
//!
//! [`SessionManager`] subscribes once to the auth change stream and is the
//! only writer of the current [`SessionState`]. Everything else reads it
//! through a cloned [`SessionHandle`].

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, sleep},
};

use crate::{AuthService, AuthState, LedgerError, Principal};

/// Minimum time the splash screen stays up after the first auth notification.
pub const DEFAULT_SPLASH: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// True until the splash delay has elapsed after the first notification.
    pub resolving: bool,
    pub principal: Option<Principal>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            resolving: true,
            principal: None,
        }
    }
}

impl SessionState {
    pub fn owner(&self) -> Option<&str> {
        self.principal.as_ref().map(|p| p.uid.as_str())
    }
}

/// Read-only view of the current session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Uid of the signed-in principal.
    pub fn owner(&self) -> Option<String> {
        self.rx.borrow().owner().map(ToString::to_string)
    }

    pub fn is_resolving(&self) -> bool {
        self.rx.borrow().resolving
    }

    /// Wait for the next change. Returns `false` once the manager is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

pub struct SessionManager {
    auth: Arc<dyn AuthService>,
    session: SessionHandle,
    task: JoinHandle<()>,
}

impl SessionManager {
    /// Subscribe to `auth` and start tracking the session.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(auth: Arc<dyn AuthService>, splash: Duration) -> Self {
        let (tx, rx) = watch::channel(SessionState::default());
        let changes = auth.subscribe();
        let task = tokio::spawn(track_session(changes, tx, splash));

        Self {
            auth,
            session: SessionHandle { rx },
            task,
        }
    }

    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Principal, LedgerError> {
        self.auth.sign_in(email, password).await.map_err(|err| {
            tracing::warn!("sign-in failed: {err}");
            LedgerError::Auth(err)
        })
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<Principal, LedgerError> {
        self.auth.sign_up(email, password).await.map_err(|err| {
            tracing::warn!("sign-up failed: {err}");
            LedgerError::Auth(err)
        })
    }

    pub async fn logout(&self) -> Result<(), LedgerError> {
        self.auth.sign_out().await.map_err(|err| {
            tracing::warn!("sign-out failed: {err}");
            LedgerError::Auth(err)
        })
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn track_session(
    mut changes: watch::Receiver<AuthState>,
    tx: watch::Sender<SessionState>,
    splash: Duration,
) {
    let timer = sleep(splash);
    tokio::pin!(timer);
    // The splash delay starts with the first resolved notification and
    // fires once per process.
    let mut armed = false;
    let mut splash_done = false;

    let initial = changes.borrow_and_update().clone();
    if apply(&tx, &initial) {
        armed = true;
        timer.as_mut().reset(Instant::now() + splash);
    }

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    tracing::debug!("auth change stream closed");
                    break;
                }
                let state = changes.borrow_and_update().clone();
                if apply(&tx, &state) && !armed && !splash_done {
                    armed = true;
                    timer.as_mut().reset(Instant::now() + splash);
                }
            }
            () = &mut timer, if armed => {
                armed = false;
                splash_done = true;
                tx.send_modify(|session| session.resolving = false);
            }
        }
    }

    if armed {
        timer.await;
        tx.send_modify(|session| session.resolving = false);
    }
}

/// Copy a resolved auth notification into the session. Returns `false` while
/// the service is still restoring.
fn apply(tx: &watch::Sender<SessionState>, state: &AuthState) -> bool {
    let Some(principal) = state.resolved() else {
        return false;
    };
    let principal = principal.cloned();
    match &principal {
        Some(p) => tracing::info!(uid = %p.uid, "session signed in"),
        None => tracing::info!("session signed out"),
    }
    tx.send_modify(|session| session.principal = principal);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAuth;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn starts_resolving_with_unknown_session() {
        let auth = Arc::new(MemoryAuth::new());
        let manager = SessionManager::start(auth, DEFAULT_SPLASH);
        settle().await;

        let session = manager.session().current();
        assert!(session.resolving);
        assert_eq!(session.principal, None);
    }

    #[tokio::test(start_paused = true)]
    async fn resolving_clears_after_splash_delay() {
        let auth = Arc::new(MemoryAuth::new());
        let manager = SessionManager::start(auth.clone(), DEFAULT_SPLASH);
        auth.publish(AuthState::SignedOut);
        settle().await;

        assert!(manager.session().is_resolving());

        tokio::time::sleep(Duration::from_millis(2999)).await;
        settle().await;
        assert!(manager.session().is_resolving());

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert!(!manager.session().is_resolving());
    }

    #[tokio::test(start_paused = true)]
    async fn notification_before_start_is_not_lost() {
        let auth = Arc::new(MemoryAuth::new());
        auth.publish(AuthState::SignedOut);
        let manager = SessionManager::start(auth, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(20)).await;
        settle().await;
        assert!(!manager.session().is_resolving());
    }

    #[tokio::test(start_paused = true)]
    async fn login_updates_session_through_the_change_stream() {
        let auth = Arc::new(MemoryAuth::signed_out().with_account("a@b.c", "secret1"));
        let manager = SessionManager::start(auth, Duration::ZERO);

        let principal = manager.login("a@b.c", "secret1").await.unwrap();
        settle().await;

        assert_eq!(manager.session().owner(), Some(principal.uid));
    }

    #[tokio::test(start_paused = true)]
    async fn login_failure_surfaces_service_message() {
        let auth = Arc::new(MemoryAuth::signed_out());
        let manager = SessionManager::start(auth, Duration::ZERO);

        let err = manager.login("nobody@b.c", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "INVALID_LOGIN_CREDENTIALS");
        settle().await;
        assert_eq!(manager.session().owner(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_signs_the_session_out() {
        let auth = Arc::new(MemoryAuth::signed_out());
        let manager = SessionManager::start(auth, Duration::ZERO);

        manager.signup("new@b.c", "secret1").await.unwrap();
        settle().await;
        assert!(manager.session().owner().is_some());

        manager.logout().await.unwrap();
        settle().await;
        assert_eq!(manager.session().owner(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn splash_runs_once_per_start() {
        let auth = Arc::new(MemoryAuth::signed_out().with_account("a@b.c", "secret1"));
        let manager = SessionManager::start(auth, Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(150)).await;
        settle().await;
        assert!(!manager.session().is_resolving());

        manager.login("a@b.c", "secret1").await.unwrap();
        settle().await;
        let session = manager.session().current();
        assert!(!session.resolving);
        assert!(session.principal.is_some());
    }
}
