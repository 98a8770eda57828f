//! Account directory and session lifecycle.
//!
//! # Session model
//!
//! A session is the account mirrored into the current-user record, together
//! with the `session_active` flag on the matching directory entry. Login and
//! signup set both; logout clears both. Every mutation persists the records
//! through the [`StorageAdapter`] before returning.
//!
//! The manager does not enforce a single active flag across the directory:
//! logging in as one account leaves other entries' flags as they were.

mod errors;
mod latency;

use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::models::Account;
use crate::storage::StorageAdapter;

pub use errors::AuthError;
pub use latency::Latency;

#[derive(Debug, Default)]
struct AuthState {
    current_user: Option<Account>,
    directory: Vec<Account>,
}

/// Owns the account directory and the current session.
///
/// Construct one per application and share clones of it; all clones see the
/// same state.
#[derive(Clone)]
pub struct SessionManager {
    storage: StorageAdapter,
    latency: Latency,
    state: Arc<Mutex<AuthState>>,
}

impl SessionManager {
    /// Create a manager whose state is loaded from `storage`.
    pub fn new(storage: StorageAdapter, latency: Latency) -> Self {
        let manager = Self {
            storage,
            latency,
            state: Arc::new(Mutex::new(AuthState::default())),
        };
        manager.reload();
        manager
    }

    /// Discard in-memory state and read both records again.
    pub fn reload(&self) {
        let current_user = self.storage.load_current_user();
        let directory = self.storage.load_directory();
        tracing::debug!(
            accounts = directory.len(),
            signed_in = current_user.is_some(),
            "Loaded session state"
        );
        *self.lock() = AuthState {
            current_user,
            directory,
        };
    }

    pub fn current_user(&self) -> Option<Account> {
        self.lock().current_user.clone()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.lock().directory.clone()
    }

    pub fn is_session_active(&self) -> bool {
        self.lock()
            .current_user
            .as_ref()
            .is_some_and(|user| user.session_active)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        self.latency.wait().await;

        let mut state = self.lock();
        let Some(existing) = state.directory.iter().find(|a| a.email == email) else {
            tracing::warn!(email, "Login for unknown account");
            return Err(AuthError::AccountNotFound);
        };
        if existing.password.as_deref() != Some(password) {
            tracing::warn!(email, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let active = existing.with_session(true);
        for record in state.directory.iter_mut().filter(|r| r.id == active.id) {
            record.session_active = true;
        }
        state.current_user = Some(active.clone());

        self.storage.save_current_user(Some(&active));
        self.storage.save_directory(&state.directory);

        tracing::info!(account_id = %active.id, "Logged in");
        Ok(active)
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        self.latency.wait().await;

        let mut state = self.lock();
        if state.directory.iter().any(|a| a.email == email) {
            tracing::warn!(email, "Signup with an email already in use");
            return Err(AuthError::EmailTaken);
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            password: Some(password.to_string()),
            session_active: true,
        };
        state.directory.push(account.clone());
        state.current_user = Some(account.clone());

        self.storage.save_current_user(Some(&account));
        self.storage.save_directory(&state.directory);

        tracing::info!(account_id = %account.id, "Signed up");
        Ok(account)
    }

    /// End the current session. Calling it with nobody signed in only
    /// re-persists the empty current-user record.
    pub fn logout(&self) {
        let mut state = self.lock();
        if let Some(current) = state.current_user.take() {
            for record in state.directory.iter_mut().filter(|r| r.id == current.id) {
                record.session_active = false;
            }
            self.storage.save_directory(&state.directory);
            tracing::info!(account_id = %current.id, "Logged out");
        }
        self.storage.save_current_user(None);
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
