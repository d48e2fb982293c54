use crate::authority::Authority;
use crate::metrics::GateMetrics;
use airlock_types::ActorId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One tracked connection. The answer starts empty and is filled by the
/// first lookup; the generation names the connect call that created the
/// entry, so an answer computed before a disconnect or reconnect can be
/// told apart from one that belongs to the live connection.
struct Entry {
    frozen: Option<bool>,
    generation: u64,
}

/// Per-actor cache of the authority's freeze answer.
///
/// An entry exists exactly while its actor is tracked, from [`track`] to
/// [`forget`]. The answer inside is computed lazily on first lookup,
/// overwritten on every authentication transition, and discarded together
/// with the entry on disconnect. Movement is checked every simulation tick
/// for every connected actor, so the steady state must be a map read with
/// no authority round trip.
///
/// The authority is never called while the map lock is held. An answer
/// that arrives after the connection it was computed for has ended is
/// thrown away, never stored for the successor connection.
///
/// A failed authority query is answered frozen but never cached: once the
/// authority recovers, the next read converges on the real answer without
/// waiting for another transition.
///
/// [`track`]: FreezeCache::track
/// [`forget`]: FreezeCache::forget
pub struct FreezeCache {
    entries: Mutex<HashMap<ActorId, Entry>>,
    next_generation: AtomicU64,
    metrics: Arc<GateMetrics>,
}

impl FreezeCache {
    pub fn new(metrics: Arc<GateMetrics>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            metrics,
        }
    }

    /// Start tracking a connection, beginning with no cached answer.
    ///
    /// Returns `false` when the actor was already tracked. Either way the
    /// entry is replaced under a fresh generation, so an in-flight lookup
    /// for the previous connection can no longer store its answer.
    pub fn track(&self, actor: &ActorId) -> bool {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.lock_entries()
            .insert(
                *actor,
                Entry {
                    frozen: None,
                    generation,
                },
            )
            .is_none()
    }

    /// Whether the actor is currently tracked.
    pub fn contains(&self, actor: &ActorId) -> bool {
        self.lock_entries().contains_key(actor)
    }

    /// Freeze state for a tracked actor, `None` when the actor is not
    /// tracked at all. A cache miss is computed from the authority and
    /// stored, unless the connection turned over while the query ran; such
    /// an answer is reported frozen and dropped.
    ///
    /// Concurrent first lookups for the same actor may each query the
    /// authority (the query is pure); whichever insert lands first wins and
    /// every caller returns the converged entry.
    pub fn lookup<A: Authority + ?Sized>(&self, authority: &A, actor: &ActorId) -> Option<bool> {
        let generation = {
            let entries = self.lock_entries();
            let entry = entries.get(actor)?;
            match entry.frozen {
                Some(frozen) => return Some(frozen),
                None => entry.generation,
            }
        };

        let computed = match self.query_freeze(authority, actor) {
            Some(computed) => computed,
            None => return Some(true),
        };

        let mut entries = self.lock_entries();
        match entries.get_mut(actor) {
            Some(entry) if entry.generation == generation => {
                Some(*entry.frozen.get_or_insert(computed))
            }
            _ => {
                tracing::debug!(
                    %actor,
                    "freeze answer discarded; connection changed during the query"
                );
                Some(true)
            }
        }
    }

    /// Recompute the entry after an authentication transition.
    ///
    /// A now-authenticated actor is written `false` directly, skipping a
    /// second authority round trip; anything else is recomputed from
    /// `should_freeze`. If the authority is unreachable the answer is
    /// cleared instead, so reads fail closed until it recovers. Repeating
    /// the call for the same transition settles on the same state, and a
    /// refresh that crosses a reconnect is discarded like any other stale
    /// answer.
    pub fn invalidate<A: Authority + ?Sized>(&self, authority: &A, actor: &ActorId) {
        let generation = match self.lock_entries().get(actor) {
            Some(entry) => entry.generation,
            None => return,
        };
        self.metrics.inc_cache_refreshes();

        let refreshed = match authority.is_authenticated(actor) {
            Ok(true) => Some(false),
            Ok(false) => self.query_freeze(authority, actor),
            Err(err) => {
                self.metrics.inc_authority_failures();
                tracing::warn!(
                    %actor,
                    error = %err,
                    "authentication query failed during invalidation; failing closed"
                );
                None
            }
        };

        let mut entries = self.lock_entries();
        match entries.get_mut(actor) {
            Some(entry) if entry.generation == generation => entry.frozen = refreshed,
            _ => {
                tracing::debug!(
                    %actor,
                    "refreshed answer discarded; connection changed during the transition"
                );
            }
        }
    }

    /// Stop tracking the actor and drop all cached state. Safe to repeat;
    /// returns whether an entry existed.
    pub fn forget(&self, actor: &ActorId) -> bool {
        self.lock_entries().remove(actor).is_some()
    }

    /// `None` means the query failed; the failure is already logged and
    /// counted here so callers only choose what to do with the miss.
    fn query_freeze<A: Authority + ?Sized>(
        &self,
        authority: &A,
        actor: &ActorId,
    ) -> Option<bool> {
        match authority.should_freeze(actor) {
            Ok(frozen) => Some(frozen),
            Err(err) => {
                self.metrics.inc_authority_failures();
                tracing::warn!(%actor, error = %err, "freeze query failed; failing closed");
                None
            }
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<ActorId, Entry>> {
        match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => {
                tracing::warn!("freeze cache lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn cached(&self, actor: &ActorId) -> Option<bool> {
        self.lock_entries().get(actor).and_then(|entry| entry.frozen)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock_entries().len()
    }
}
