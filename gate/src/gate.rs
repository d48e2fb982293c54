use crate::authority::Authority;
use crate::cache::FreezeCache;
use crate::commands::is_auth_command;
use crate::metrics::{GateMetrics, GateMetricsSnapshot};
use crate::throttle::ReminderThrottle;
use airlock_types::{ActorId, Decision, PlayerAction, DEFAULT_REMINDER_TEXT};
use std::sync::Arc;

/// The façade every event-interception point calls.
///
/// Constructed once at server start with the authority injected, then
/// shared (`Arc`) with each integration call site. All per-actor state
/// lives behind internal locks; callers never synchronize around it.
pub struct ActionGate<A: Authority> {
    authority: Arc<A>,
    cache: FreezeCache,
    throttle: ReminderThrottle,
    metrics: Arc<GateMetrics>,
    reminder_text: String,
}

impl<A: Authority> ActionGate<A> {
    pub fn new(authority: Arc<A>) -> Self {
        Self::with_reminder_text(authority, DEFAULT_REMINDER_TEXT)
    }

    /// Same gate with the embedding server's own reminder wording.
    pub fn with_reminder_text(authority: Arc<A>, reminder_text: impl Into<String>) -> Self {
        let metrics = Arc::new(GateMetrics::default());
        Self {
            authority,
            cache: FreezeCache::new(metrics.clone()),
            throttle: ReminderThrottle::new(),
            metrics,
            reminder_text: reminder_text.into(),
        }
    }

    /// Register a freshly connected actor. Gate state for the actor starts
    /// empty; the first freeze query after this populates the cache, and
    /// nothing a previous connection cached or throttled carries over.
    pub fn on_connect(&self, actor: &ActorId) {
        self.throttle.forget(actor);
        if !self.cache.track(actor) {
            tracing::warn!(%actor, "duplicate connect; resetting gate state for actor");
        }
    }

    /// Remove every trace of the actor. Safe to repeat; a reconnect starts
    /// a fresh cycle with a fresh authority lookup, and an answer still in
    /// flight for this connection is discarded instead of cached.
    pub fn on_disconnect(&self, actor: &ActorId) {
        if !self.cache.forget(actor) {
            tracing::debug!(%actor, "disconnect for an actor with no connect record");
        }
        self.throttle.forget(actor);
    }

    /// Apply an authentication transition (login success, logout, session
    /// expiry). Must be called synchronously from the transition handler so
    /// no later freeze query observes the old state.
    pub fn invalidate(&self, actor: &ActorId) {
        if !self.cache.contains(actor) {
            tracing::warn!(
                %actor,
                "authentication transition for an actor with no connect record; ignoring"
            );
            return;
        }
        self.cache.invalidate(self.authority.as_ref(), actor);
    }

    /// Current freeze state. An actor without a connect record is reported
    /// frozen and flagged as an integration lifecycle bug.
    pub fn is_frozen(&self, actor: &ActorId) -> bool {
        self.freeze_state(actor).unwrap_or(true)
    }

    /// Decide one action. Never fails; authority trouble surfaces as a
    /// denial, not an error.
    pub fn evaluate(&self, actor: &ActorId, action: &PlayerAction, now_ms: u64) -> Decision {
        self.metrics.inc_evaluations();
        let state = self.freeze_state(actor);
        if state == Some(false) {
            self.metrics.inc_allowed();
            return Decision::Allow;
        }
        // An actor with no connect record is denied like any frozen actor
        // but must not accrue per-actor state.
        let tracked = state.is_some();

        let category = action.category();
        let decision = match action {
            // Cancelling a toss the inventory cannot take back would delete
            // the stack; inventory contents outrank the freeze policy.
            PlayerAction::TossItem { returnable: false } => {
                tracing::debug!(%actor, "toss by frozen actor allowed; inventory cannot reabsorb");
                Decision::Allow
            }
            PlayerAction::Command { line } => {
                if is_auth_command(line) {
                    tracing::debug!(%actor, "auth command allowed while frozen");
                    Decision::Allow
                } else {
                    Decision::DenyWithMessage(self.reminder_text.clone())
                }
            }
            PlayerAction::Chat => {
                if tracked && self.throttle.should_notify(actor, now_ms) {
                    Decision::DenyWithMessage(self.reminder_text.clone())
                } else {
                    Decision::Deny
                }
            }
            PlayerAction::Move { .. }
            | PlayerAction::BreakBlock { .. }
            | PlayerAction::PlaceBlock { .. }
            | PlayerAction::TossItem { returnable: true }
            | PlayerAction::PickUpItem
            | PlayerAction::InteractBlock { .. }
            | PlayerAction::InteractItem => Decision::Deny,
        };

        match &decision {
            Decision::Allow => self.metrics.inc_allowed(),
            Decision::Deny => {
                self.metrics.record_denial(category);
                tracing::trace!(
                    %actor,
                    category = category.as_str(),
                    "action denied while frozen"
                );
            }
            Decision::DenyWithMessage(_) => {
                self.metrics.record_denial(category);
                self.metrics.inc_reminders_sent();
                tracing::debug!(
                    %actor,
                    category = category.as_str(),
                    "action denied while frozen; reminder issued"
                );
            }
        }
        decision
    }

    pub fn metrics_snapshot(&self) -> GateMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Freeze state, `None` for an actor with no connect record. The
    /// unknown-actor diagnostic fires here.
    fn freeze_state(&self, actor: &ActorId) -> Option<bool> {
        let state = self.cache.lookup(self.authority.as_ref(), actor);
        if state.is_none() {
            self.metrics.inc_unknown_actor_queries();
            tracing::error!(
                %actor,
                "freeze query for an actor with no connect record; treating as frozen"
            );
        }
        state
    }

    #[cfg(test)]
    pub(crate) fn cached_freeze_state(&self, actor: &ActorId) -> Option<bool> {
        self.cache.cached(actor)
    }

    #[cfg(test)]
    pub(crate) fn tracked_actors(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    pub(crate) fn throttled_actors(&self) -> usize {
        self.throttle.len()
    }
}
