pub mod action;
pub mod actor;
pub mod decision;
pub mod world;

pub use action::{ActionCategory, PlayerAction};
pub use actor::{ActorId, ActorIdError};
pub use decision::Decision;
pub use world::{BlockPos, ItemStack, Vec3};

/// Minimum interval between consecutive gate reminders to the same actor.
pub const REMINDER_INTERVAL_MS: u64 = 5_000;

/// Commands an unauthenticated actor may still run, matched against the
/// normalized command line by prefix so trailing arguments pass through.
pub const AUTH_COMMAND_PREFIXES: [&str; 2] = ["login", "register"];

/// Default reminder sent alongside denied chat and command attempts.
pub const DEFAULT_REMINDER_TEXT: &str =
    "You must authenticate first: /login <password> or /register <password> <confirm>";
