//! Event guards: the glue between host engine events and the gate.
//!
//! One [`GateHooks`] instance is registered against the host's event bus
//! at server start. Each `on_*` guard translates its event into a
//! [`PlayerAction`], asks the gate, applies the side effects the policy
//! calls for (reminder delivery, position reset, stack restoration), and
//! returns a ruling the host applies to the event.
//!
//! Guards never block on the authority beyond the gate's own cache fill
//! and never panic; a poisoned internal lock is recovered and logged.

use crate::events::{
    BlockBreakEvent, BlockPlaceEvent, ChatEvent, CommandEvent, InteractEvent, InteractTarget,
    ItemPickupEvent, ItemTossEvent, MovementEvent,
};
use crate::host::{Inventory, Messenger};
use airlock_gate::{ActionGate, Authority};
use airlock_types::{ActorId, Decision, PlayerAction, Vec3};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of a guard for events the host can simply drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventRuling {
    Proceed,
    Cancel,
}

/// Outcome of the movement guard. A cancelled move carries the position
/// the host must snap the actor back to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MovementRuling {
    Proceed,
    ResetTo(Vec3),
}

/// Outcome of the toss guard. `CancelRestored` means the stack is back
/// in the inventory and the host must drop the event without spawning
/// the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TossRuling {
    Proceed,
    CancelRestored,
}

/// Guard set wired to one gate and one outbound messenger.
pub struct GateHooks<A: Authority, M: Messenger> {
    gate: Arc<ActionGate<A>>,
    messenger: Arc<M>,
    stable_positions: Mutex<HashMap<ActorId, Vec3>>,
}

impl<A: Authority, M: Messenger> GateHooks<A, M> {
    pub fn new(gate: Arc<ActionGate<A>>, messenger: Arc<M>) -> Self {
        Self {
            gate,
            messenger,
            stable_positions: Mutex::new(HashMap::new()),
        }
    }

    /// Actor joined at `spawn`. Seeds the reset anchor so a frozen actor
    /// who never moved legally still has a place to snap back to.
    pub fn on_connect(&self, actor: &ActorId, spawn: Vec3) {
        self.gate.on_connect(actor);
        self.lock_positions().insert(*actor, spawn);
        tracing::info!(%actor, "actor connected; gate engaged");
    }

    pub fn on_disconnect(&self, actor: &ActorId) {
        self.gate.on_disconnect(actor);
        self.lock_positions().remove(actor);
        tracing::info!(%actor, "actor disconnected; gate state cleared");
    }

    /// The authenticator accepted a login or registration.
    pub fn on_login_success(&self, actor: &ActorId) {
        self.gate.invalidate(actor);
        tracing::info!(%actor, "login transition applied");
    }

    /// The actor's session lapsed; the next freeze query re-resolves.
    pub fn on_session_expired(&self, actor: &ActorId) {
        self.gate.invalidate(actor);
        tracing::info!(%actor, "session expiry applied");
    }

    /// Movement guard. Denied moves resolve to the last position the gate
    /// allowed, falling back to the event origin when none was recorded.
    pub fn on_movement(&self, event: &MovementEvent, now_ms: u64) -> MovementRuling {
        let action = PlayerAction::Move { to: event.to };
        let decision = self.gate.evaluate(&event.actor, &action, now_ms);
        if decision.is_allowed() {
            self.lock_positions().insert(event.actor, event.to);
            return MovementRuling::Proceed;
        }
        let anchor = self
            .lock_positions()
            .get(&event.actor)
            .copied()
            .unwrap_or(event.from);
        MovementRuling::ResetTo(anchor)
    }

    pub fn on_block_break(&self, event: &BlockBreakEvent, now_ms: u64) -> EventRuling {
        let action = PlayerAction::BreakBlock {
            position: event.position,
        };
        self.rule(&event.actor, &self.gate.evaluate(&event.actor, &action, now_ms))
    }

    pub fn on_block_place(&self, event: &BlockPlaceEvent, now_ms: u64) -> EventRuling {
        let action = PlayerAction::PlaceBlock {
            position: event.position,
        };
        self.rule(&event.actor, &self.gate.evaluate(&event.actor, &action, now_ms))
    }

    /// Toss guard. The returnability probe runs before the gate decides so
    /// the policy can spare stacks the inventory has no room for. When a
    /// cancelled stack no longer fits (the inventory filled in between),
    /// the toss proceeds rather than deleting the stack.
    pub fn on_item_toss(
        &self,
        event: &ItemTossEvent,
        inventory: &dyn Inventory,
        now_ms: u64,
    ) -> TossRuling {
        let returnable = inventory.can_accept(&event.actor, &event.stack);
        let action = PlayerAction::TossItem { returnable };
        let decision = self.gate.evaluate(&event.actor, &action, now_ms);
        if decision.is_allowed() {
            return TossRuling::Proceed;
        }
        if inventory.store(&event.actor, event.stack) {
            TossRuling::CancelRestored
        } else {
            tracing::warn!(
                actor = %event.actor,
                item_id = event.stack.item_id,
                count = event.stack.count,
                "cancelled toss could not be restored; letting the toss proceed"
            );
            TossRuling::Proceed
        }
    }

    pub fn on_item_pickup(&self, event: &ItemPickupEvent, now_ms: u64) -> EventRuling {
        self.rule(
            &event.actor,
            &self
                .gate
                .evaluate(&event.actor, &PlayerAction::PickUpItem, now_ms),
        )
    }

    pub fn on_interact(&self, event: &InteractEvent, now_ms: u64) -> EventRuling {
        let action = match event.target {
            InteractTarget::Block(position) => PlayerAction::InteractBlock { position },
            InteractTarget::HeldItem => PlayerAction::InteractItem,
        };
        self.rule(&event.actor, &self.gate.evaluate(&event.actor, &action, now_ms))
    }

    pub fn on_chat(&self, event: &ChatEvent, now_ms: u64) -> EventRuling {
        self.rule(
            &event.actor,
            &self.gate.evaluate(&event.actor, &PlayerAction::Chat, now_ms),
        )
    }

    pub fn on_command(&self, event: &CommandEvent, now_ms: u64) -> EventRuling {
        let action = PlayerAction::Command {
            line: event.line.clone(),
        };
        self.rule(&event.actor, &self.gate.evaluate(&event.actor, &action, now_ms))
    }

    /// Deliver any attached reminder, then map the decision onto the event.
    fn rule(&self, actor: &ActorId, decision: &Decision) -> EventRuling {
        if let Some(text) = decision.message() {
            self.messenger.send_system(actor, text);
        }
        if decision.is_allowed() {
            EventRuling::Proceed
        } else {
            EventRuling::Cancel
        }
    }

    fn lock_positions(&self) -> MutexGuard<'_, HashMap<ActorId, Vec3>> {
        match self.stable_positions.lock() {
            Ok(positions) => positions,
            Err(poisoned) => {
                tracing::warn!("stable position lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}
