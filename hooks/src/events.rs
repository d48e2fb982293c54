//! Event payloads delivered by the host engine.
//!
//! These mirror the cancellable events a live server raises before an
//! action takes effect. Each carries the acting actor plus whatever the
//! guard needs to translate the event into a [`PlayerAction`].
//!
//! [`PlayerAction`]: airlock_types::PlayerAction

use airlock_types::{ActorId, BlockPos, ItemStack, Vec3};

/// An actor moved (or tried to) from one position to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementEvent {
    pub actor: ActorId,
    pub from: Vec3,
    pub to: Vec3,
}

/// An actor is breaking a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockBreakEvent {
    pub actor: ActorId,
    pub position: BlockPos,
}

/// An actor is placing a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockPlaceEvent {
    pub actor: ActorId,
    pub position: BlockPos,
}

/// An actor is tossing an item stack out of their control.
///
/// The stack travels with the event so a cancelling guard can hand it
/// back to the host inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemTossEvent {
    pub actor: ActorId,
    pub stack: ItemStack,
}

/// An actor is picking an item stack up off the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemPickupEvent {
    pub actor: ActorId,
    pub stack: ItemStack,
}

/// What an interaction is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractTarget {
    /// A block in the world (door, lever, chest).
    Block(BlockPos),
    /// The item currently held by the actor.
    HeldItem,
}

/// An actor is interacting with a block or their held item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractEvent {
    pub actor: ActorId,
    pub target: InteractTarget,
}

/// An actor sent a chat line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEvent {
    pub actor: ActorId,
    pub message: String,
}

/// An actor issued a command line (leading slash included when typed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEvent {
    pub actor: ActorId,
    pub line: String,
}
