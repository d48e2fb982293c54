use airlock_types::{ActorId, REMINDER_INTERVAL_MS};
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-actor limiter for gate reminder messages.
///
/// Chat from a frozen actor can arrive far faster than anyone reads system
/// messages; only the first denial per window gets a reminder. The window is
/// fixed at [`REMINDER_INTERVAL_MS`].
pub struct ReminderThrottle {
    last_sent: Mutex<HashMap<ActorId, u64>>,
}

impl ReminderThrottle {
    pub fn new() -> Self {
        Self {
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a reminder may be sent at `now_ms`, recording the send iff
    /// the answer is yes.
    ///
    /// Fires when no reminder was ever sent or the window has fully
    /// elapsed. A clock that runs backwards counts as zero elapsed time and
    /// suppresses.
    pub fn should_notify(&self, actor: &ActorId, now_ms: u64) -> bool {
        let mut last_sent = self.lock_last_sent();
        match last_sent.get(actor) {
            Some(&last) if now_ms.saturating_sub(last) < REMINDER_INTERVAL_MS => false,
            _ => {
                last_sent.insert(*actor, now_ms);
                true
            }
        }
    }

    /// Drop the actor's reminder timestamp. Safe to call when none exists.
    pub fn forget(&self, actor: &ActorId) {
        self.lock_last_sent().remove(actor);
    }

    fn lock_last_sent(&self) -> std::sync::MutexGuard<'_, HashMap<ActorId, u64>> {
        match self.last_sent.lock() {
            Ok(last_sent) => last_sent,
            Err(poisoned) => {
                tracing::warn!("reminder throttle lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock_last_sent().len()
    }
}

impl Default for ReminderThrottle {
    fn default() -> Self {
        Self::new()
    }
}
