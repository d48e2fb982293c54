//! Scripted world state: actor positions, slot inventories, and the
//! system-message channel the guards write reminders to.

use airlock_hooks::{Inventory, Messenger};
use airlock_types::{ActorId, ItemStack, Vec3};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_INVENTORY_CAPACITY: usize = 27;

#[derive(Clone, Debug)]
struct ActorState {
    name: String,
    position: Vec3,
    // Slot model: one stack per slot, no merging.
    inventory: Vec<ItemStack>,
    capacity: usize,
}

#[derive(Debug, Default)]
pub struct World {
    actors: Mutex<HashMap<ActorId, ActorState>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&self, name: impl Into<String>, position: Vec3, capacity: usize) -> ActorId {
        let actor = ActorId::random();
        let state = ActorState {
            name: name.into(),
            position,
            inventory: Vec::new(),
            capacity,
        };
        self.lock_actors().insert(actor, state);
        actor
    }

    pub fn despawn(&self, actor: &ActorId) {
        self.lock_actors().remove(actor);
    }

    pub fn name(&self, actor: &ActorId) -> Option<String> {
        self.lock_actors().get(actor).map(|state| state.name.clone())
    }

    pub fn position(&self, actor: &ActorId) -> Option<Vec3> {
        self.lock_actors().get(actor).map(|state| state.position)
    }

    pub fn set_position(&self, actor: &ActorId, position: Vec3) {
        if let Some(state) = self.lock_actors().get_mut(actor) {
            state.position = position;
        }
    }

    pub fn stacks_held(&self, actor: &ActorId) -> usize {
        self.lock_actors()
            .get(actor)
            .map(|state| state.inventory.len())
            .unwrap_or(0)
    }

    /// Same slot rules as [`Inventory::store`]; used to preload actors.
    pub fn give(&self, actor: &ActorId, stack: ItemStack) -> bool {
        self.store(actor, stack)
    }

    fn lock_actors(&self) -> MutexGuard<'_, HashMap<ActorId, ActorState>> {
        match self.actors.lock() {
            Ok(actors) => actors,
            Err(poisoned) => {
                tracing::warn!("world lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Inventory for World {
    fn can_accept(&self, actor: &ActorId, _stack: &ItemStack) -> bool {
        self.lock_actors()
            .get(actor)
            .map(|state| state.inventory.len() < state.capacity)
            .unwrap_or(false)
    }

    fn store(&self, actor: &ActorId, stack: ItemStack) -> bool {
        match self.lock_actors().get_mut(actor) {
            Some(state) if state.inventory.len() < state.capacity => {
                state.inventory.push(stack);
                true
            }
            _ => false,
        }
    }
}

/// Captures every system message and echoes it at debug level so harness
/// runs show reminder traffic in the log.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(ActorId, String)>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.lock_sent().len()
    }

    pub fn count_for(&self, actor: &ActorId) -> usize {
        self.lock_sent()
            .iter()
            .filter(|(recipient, _)| recipient == actor)
            .count()
    }

    pub fn last_for(&self, actor: &ActorId) -> Option<String> {
        self.lock_sent()
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == actor)
            .map(|(_, text)| text.clone())
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<(ActorId, String)>> {
        match self.sent.lock() {
            Ok(sent) => sent,
            Err(poisoned) => {
                tracing::warn!("messenger lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Messenger for RecordingMessenger {
    fn send_system(&self, actor: &ActorId, text: &str) {
        tracing::debug!(%actor, text, "system message delivered");
        self.lock_sent().push((*actor, text.to_string()));
    }
}
