//! Scenario harness for the airlock gate.
//!
//! Wires the real gate and guard crates to an in-memory world and
//! authenticator, replays seeded gameplay schedules against them, and
//! serves the gate's counters over a small status API. The binary in
//! `main.rs` drives one scenario from the command line; the pieces are
//! all public so integration tests can assemble their own.

pub mod api;
pub mod authority;
pub mod dispatch;
pub mod scenario;
pub mod world;


pub use api::{router, ApiState};
pub use authority::{AuthError, TableAuthority};
pub use dispatch::EventPipeline;
pub use scenario::{
    HarnessConfig, Scenario, ScenarioSummary, SimClock, DEFAULT_ACTORS, DEFAULT_LOGIN_AFTER_TICKS,
    DEFAULT_SEED, DEFAULT_TICKS, DEFAULT_TICK_INTERVAL_MS,
};
pub use world::{RecordingMessenger, World, DEFAULT_INVENTORY_CAPACITY};
