//! In-memory authenticator backing the harness.
//!
//! [`TableAuthority`] keeps registered credentials and open sessions in
//! plain maps and exposes the [`Authority`] queries the gate consumes.
//! An injected outage makes both queries fail, which is how harness runs
//! exercise the gate's fail-closed path.
//!
//! Lifecycle wiring is the host's job: the harness calls
//! [`TableAuthority::on_disconnect`] alongside the gate's own disconnect
//! handling, it is not called from inside the gate.

use airlock_gate::{Authority, AuthorityError};
use airlock_types::ActorId;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Authenticator outcomes surfaced to the actor as system messages.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("account already registered; use /login <password>")]
    AlreadyRegistered,
    #[error("no account registered; use /register <password> <confirm>")]
    NotRegistered,
    #[error("wrong password")]
    WrongPassword,
}

#[derive(Debug, Default)]
pub struct TableAuthority {
    accounts: Mutex<HashMap<ActorId, String>>,
    sessions: Mutex<HashSet<ActorId>>,
    outage: AtomicBool,
}

impl TableAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the injected outage. Logged only on transitions so tick
    /// loops can call this every tick.
    pub fn set_outage(&self, active: bool) {
        if self.outage.swap(active, Ordering::Relaxed) != active {
            if active {
                tracing::warn!("authority outage injected");
            } else {
                tracing::info!("authority outage lifted");
            }
        }
    }

    /// Create an account. A successful registration opens a session, so
    /// the caller can apply the login transition immediately.
    pub fn register(&self, actor: &ActorId, password: &str, confirm: &str) -> Result<(), AuthError> {
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        let mut accounts = self.lock_accounts();
        if accounts.contains_key(actor) {
            return Err(AuthError::AlreadyRegistered);
        }
        accounts.insert(*actor, password.to_string());
        drop(accounts);
        self.lock_sessions().insert(*actor);
        tracing::info!(%actor, "account registered; session opened");
        Ok(())
    }

    pub fn login(&self, actor: &ActorId, password: &str) -> Result<(), AuthError> {
        let accounts = self.lock_accounts();
        let stored = accounts.get(actor).ok_or(AuthError::NotRegistered)?;
        if stored != password {
            return Err(AuthError::WrongPassword);
        }
        drop(accounts);
        self.lock_sessions().insert(*actor);
        tracing::info!(%actor, "login accepted; session opened");
        Ok(())
    }

    /// Close the actor's session without touching the account. Models
    /// logout and administrative expiry.
    pub fn end_session(&self, actor: &ActorId) {
        if self.lock_sessions().remove(actor) {
            tracing::info!(%actor, "session ended");
        }
    }

    fn check_outage(&self) -> Result<(), AuthorityError> {
        if self.outage.load(Ordering::Relaxed) {
            return Err(AuthorityError::Unreachable {
                reason: "injected outage".to_string(),
            });
        }
        Ok(())
    }

    /// Query-path lock. Poison is reported as a query failure instead of
    /// recovered, so the gate falls back to its fail-closed handling
    /// rather than trusting a store a panic may have torn.
    fn query_sessions(&self) -> Result<MutexGuard<'_, HashSet<ActorId>>, AuthorityError> {
        self.sessions.lock().map_err(|_| AuthorityError::QueryFailed {
            reason: "session store lock poisoned".to_string(),
        })
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashSet<ActorId>> {
        match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(poisoned) => {
                tracing::warn!("session store lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    fn lock_accounts(&self) -> MutexGuard<'_, HashMap<ActorId, String>> {
        match self.accounts.lock() {
            Ok(accounts) => accounts,
            Err(poisoned) => {
                tracing::warn!("account store lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Authority for TableAuthority {
    fn should_freeze(&self, actor: &ActorId) -> Result<bool, AuthorityError> {
        self.check_outage()?;
        Ok(!self.query_sessions()?.contains(actor))
    }

    fn is_authenticated(&self, actor: &ActorId) -> Result<bool, AuthorityError> {
        self.check_outage()?;
        Ok(self.query_sessions()?.contains(actor))
    }

    fn on_disconnect(&self, actor: &ActorId) {
        if self.lock_sessions().remove(actor) {
            tracing::info!(%actor, "session ended on disconnect");
        }
    }
}
