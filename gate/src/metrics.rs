use airlock_types::ActionCategory;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for gate activity. All increments are relaxed; totals are for
/// observability, not for control flow.
#[derive(Default)]
pub struct GateMetrics {
    evaluations: AtomicU64,
    allowed: AtomicU64,
    denied_movement: AtomicU64,
    denied_world_mutation: AtomicU64,
    denied_item_transfer: AtomicU64,
    denied_interaction: AtomicU64,
    denied_chat: AtomicU64,
    denied_command: AtomicU64,
    reminders_sent: AtomicU64,
    authority_failures: AtomicU64,
    unknown_actor_queries: AtomicU64,
    cache_refreshes: AtomicU64,
}

impl GateMetrics {
    pub(crate) fn inc_evaluations(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_allowed(&self) {
        self.allowed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denial(&self, category: ActionCategory) {
        let counter = match category {
            ActionCategory::Movement => &self.denied_movement,
            ActionCategory::WorldMutation => &self.denied_world_mutation,
            ActionCategory::ItemTransfer => &self.denied_item_transfer,
            ActionCategory::Interaction => &self.denied_interaction,
            ActionCategory::Chat => &self.denied_chat,
            ActionCategory::Command => &self.denied_command,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_reminders_sent(&self) {
        self.reminders_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_authority_failures(&self) {
        self.authority_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_unknown_actor_queries(&self) {
        self.unknown_actor_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_cache_refreshes(&self) {
        self.cache_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GateMetricsSnapshot {
        GateMetricsSnapshot {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            allowed: self.allowed.load(Ordering::Relaxed),
            denied_movement: self.denied_movement.load(Ordering::Relaxed),
            denied_world_mutation: self.denied_world_mutation.load(Ordering::Relaxed),
            denied_item_transfer: self.denied_item_transfer.load(Ordering::Relaxed),
            denied_interaction: self.denied_interaction.load(Ordering::Relaxed),
            denied_chat: self.denied_chat.load(Ordering::Relaxed),
            denied_command: self.denied_command.load(Ordering::Relaxed),
            reminders_sent: self.reminders_sent.load(Ordering::Relaxed),
            authority_failures: self.authority_failures.load(Ordering::Relaxed),
            unknown_actor_queries: self.unknown_actor_queries.load(Ordering::Relaxed),
            cache_refreshes: self.cache_refreshes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`GateMetrics`], shaped for JSON status surfaces.
#[derive(Clone, Debug, Serialize)]
pub struct GateMetricsSnapshot {
    pub evaluations: u64,
    pub allowed: u64,
    pub denied_movement: u64,
    pub denied_world_mutation: u64,
    pub denied_item_transfer: u64,
    pub denied_interaction: u64,
    pub denied_chat: u64,
    pub denied_command: u64,
    pub reminders_sent: u64,
    pub authority_failures: u64,
    pub unknown_actor_queries: u64,
    pub cache_refreshes: u64,
}

impl GateMetricsSnapshot {
    /// Total denials across every category.
    pub fn denied_total(&self) -> u64 {
        self.denied_movement
            .saturating_add(self.denied_world_mutation)
            .saturating_add(self.denied_item_transfer)
            .saturating_add(self.denied_interaction)
            .saturating_add(self.denied_chat)
            .saturating_add(self.denied_command)
    }
}
