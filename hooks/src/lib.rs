//! Host-side event adapters for the airlock gate.
//!
//! `airlock-gate` decides; this crate applies those decisions to a live
//! server's event bus. It defines the event payloads a host forwards
//! ([`events`]), the engine capabilities guards need ([`host`]), listener
//! placement ([`priority`]), and the guard set itself ([`guards`]).
//!
//! The embedding server constructs one [`GateHooks`] per gate, registers
//! each guard at the priority [`dispatch_priority`] reports, and routes
//! authenticator callbacks to [`GateHooks::on_login_success`] and
//! [`GateHooks::on_session_expired`].

pub mod events;
pub mod guards;
pub mod host;
pub mod priority;


pub use events::{
    BlockBreakEvent, BlockPlaceEvent, ChatEvent, CommandEvent, InteractEvent, InteractTarget,
    ItemPickupEvent, ItemTossEvent, MovementEvent,
};
pub use guards::{EventRuling, GateHooks, MovementRuling, TossRuling};
pub use host::{Inventory, Messenger};
pub use priority::{dispatch_priority, HookPriority};
