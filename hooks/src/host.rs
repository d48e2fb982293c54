//! Host engine capabilities the guards depend on.
//!
//! The gate never talks to the engine directly; the embedding server
//! implements these traits over whatever its player API looks like.

use airlock_types::{ActorId, ItemStack};

/// Delivers system-channel text to a single actor.
pub trait Messenger: Send + Sync {
    fn send_system(&self, actor: &ActorId, text: &str);
}

/// The slice of the host inventory API the toss guard needs.
pub trait Inventory: Send + Sync {
    /// Whether the actor's inventory has room for the stack right now.
    fn can_accept(&self, actor: &ActorId, stack: &ItemStack) -> bool;

    /// Put the stack back into the actor's inventory. Returns false when
    /// the inventory filled up between the check and the store.
    fn store(&self, actor: &ActorId, stack: ItemStack) -> bool;
}
