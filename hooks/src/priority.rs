//! Listener ordering for host event buses.

use airlock_types::ActionCategory;

/// Where a guard should sit in the host's listener chain.
///
/// `First` listeners run before any other plugin sees the event. Ordering
/// follows the derive: `First < Normal`, so dispatchers run listeners in
/// ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookPriority {
    First,
    Normal,
}

/// The registration priority for a category's guard.
///
/// Command and item-transfer events must be ruled on before other
/// listeners run: a command executor must never see a blocked command,
/// and a cancelled toss mutates the inventory other listeners inspect.
pub const fn dispatch_priority(category: ActionCategory) -> HookPriority {
    match category {
        ActionCategory::Command | ActionCategory::ItemTransfer => HookPriority::First,
        ActionCategory::Movement
        | ActionCategory::WorldMutation
        | ActionCategory::Interaction
        | ActionCategory::Chat => HookPriority::Normal,
    }
}
