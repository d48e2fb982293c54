use crate::world::{BlockPos, Vec3};

/// The fixed classes of intercepted behavior. Closed set: policy, metrics,
/// and hook registration all match over it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    Movement,
    WorldMutation,
    ItemTransfer,
    Interaction,
    Chat,
    Command,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 6] = [
        ActionCategory::Movement,
        ActionCategory::WorldMutation,
        ActionCategory::ItemTransfer,
        ActionCategory::Interaction,
        ActionCategory::Chat,
        ActionCategory::Command,
    ];

    /// Stable lower-case label for log fields and metrics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Movement => "movement",
            ActionCategory::WorldMutation => "world_mutation",
            ActionCategory::ItemTransfer => "item_transfer",
            ActionCategory::Interaction => "interaction",
            ActionCategory::Chat => "chat",
            ActionCategory::Command => "command",
        }
    }
}

/// A single inbound action, carrying only the payload the gate's policy
/// reads. Event-source detail (chat text, full item stacks, cancellation
/// handles) stays with the integration adapter that built the action.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerAction {
    /// Tick-driven position update toward `to`.
    Move { to: Vec3 },

    /// Breaking a block at `position`.
    BreakBlock { position: BlockPos },

    /// Placing a block at `position`.
    PlaceBlock { position: BlockPos },

    /// Dropping an item out of the actor's own inventory. `returnable` is
    /// whether that inventory could take the full stack back right now.
    TossItem { returnable: bool },

    /// Picking up an item from the world.
    PickUpItem,

    /// Right-clicking a block.
    InteractBlock { position: BlockPos },

    /// Right-clicking with (or on) a held item.
    InteractItem,

    /// Speaking in chat. The text itself is never policy input.
    Chat,

    /// Running a command, raw line as typed (leading `/` and all).
    Command { line: String },
}

impl PlayerAction {
    pub const fn category(&self) -> ActionCategory {
        match self {
            PlayerAction::Move { .. } => ActionCategory::Movement,
            PlayerAction::BreakBlock { .. } | PlayerAction::PlaceBlock { .. } => {
                ActionCategory::WorldMutation
            }
            PlayerAction::TossItem { .. } | PlayerAction::PickUpItem => {
                ActionCategory::ItemTransfer
            }
            PlayerAction::InteractBlock { .. } | PlayerAction::InteractItem => {
                ActionCategory::Interaction
            }
            PlayerAction::Chat => ActionCategory::Chat,
            PlayerAction::Command { .. } => ActionCategory::Command,
        }
    }
}
