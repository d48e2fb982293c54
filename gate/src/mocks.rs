//! Test doubles shared with dependent crates via the `mocks` feature.

use crate::authority::{Authority, AuthorityError};
use airlock_types::ActorId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Scriptable in-memory authority.
///
/// Starts with every actor unauthenticated; tests drive transitions with
/// [`grant`](Self::grant) / [`revoke`](Self::revoke) and outages with
/// [`set_unreachable`](Self::set_unreachable). Query counters make cache
/// behavior observable.
#[derive(Default)]
pub struct MockAuthority {
    authenticated: Mutex<HashSet<ActorId>>,
    unreachable: AtomicBool,
    freeze_queries: AtomicU64,
    auth_queries: AtomicU64,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the actor authenticated, as a successful login would.
    pub fn grant(&self, actor: &ActorId) {
        self.lock_authenticated().insert(*actor);
    }

    /// Mark the actor unauthenticated, as a logout or expiry would.
    pub fn revoke(&self, actor: &ActorId) {
        self.lock_authenticated().remove(actor);
    }

    /// Make every query fail until turned off again.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of `should_freeze` calls, including failed ones.
    pub fn freeze_queries(&self) -> u64 {
        self.freeze_queries.load(Ordering::SeqCst)
    }

    /// Number of `is_authenticated` calls, including failed ones.
    pub fn auth_queries(&self) -> u64 {
        self.auth_queries.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), AuthorityError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(AuthorityError::Unreachable {
                reason: "mock authority offline".into(),
            })
        } else {
            Ok(())
        }
    }

    fn lock_authenticated(&self) -> std::sync::MutexGuard<'_, HashSet<ActorId>> {
        self.authenticated
            .lock()
            .expect("mock authority lock poisoned")
    }
}

impl Authority for MockAuthority {
    fn should_freeze(&self, actor: &ActorId) -> Result<bool, AuthorityError> {
        self.freeze_queries.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(!self.lock_authenticated().contains(actor))
    }

    fn is_authenticated(&self, actor: &ActorId) -> Result<bool, AuthorityError> {
        self.auth_queries.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.lock_authenticated().contains(actor))
    }
}
