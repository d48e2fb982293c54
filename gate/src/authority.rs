use airlock_types::ActorId;
use thiserror::Error;

/// Failure of an authority query. The gate never surfaces these to event
/// callers; a failed query is answered fail-closed (frozen) and logged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// The authority could not be reached at all.
    #[error("authority unreachable: {reason}")]
    Unreachable { reason: String },

    /// The authority answered but could not resolve the query.
    #[error("authority query failed: {reason}")]
    QueryFailed { reason: String },
}

/// Read-only view of the external authentication authority.
///
/// The gate never mutates authoritative state through this trait: it reads
/// the two queries and relies on the host calling
/// [`ActionGate::invalidate`](crate::ActionGate::invalidate) whenever the
/// authority reports a transition (login success, logout, session expiry).
///
/// Both queries must be pure and cheap: they are issued at most once per
/// connection in the common case (the gate caches the answer), but may be
/// called repeatedly and concurrently for the same actor while the cache is
/// cold, and must return the same answer for the same instant.
pub trait Authority: Send + Sync {
    /// Whether the actor's actions should currently be suppressed.
    fn should_freeze(&self, actor: &ActorId) -> Result<bool, AuthorityError>;

    /// Whether the actor has completed authentication.
    fn is_authenticated(&self, actor: &ActorId) -> Result<bool, AuthorityError>;

    /// Session opened. Authorities that do not track sessions can ignore it.
    fn on_connect(&self, _actor: &ActorId) {}

    /// Session closed.
    fn on_disconnect(&self, _actor: &ActorId) {}
}
