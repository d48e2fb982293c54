//! Action gating for connected but not-yet-authenticated actors.
//!
//! Until an actor completes login, everything it tries (moving, breaking
//! or placing blocks, moving items, interacting, chatting, running
//! commands) is suppressed, except the commands that perform
//! authentication. Every event source on the host asks the same
//! [`ActionGate`] and applies the returned
//! [`Decision`](airlock_types::Decision) with its own cancellation
//! mechanism.
//!
//! # Properties
//!
//! - **Fail closed.** If the authority cannot be queried, the actor is
//!   treated as frozen. An authentication check never fails open, and a
//!   failed query is never cached, so the freeze lifts as soon as the
//!   authority recovers.
//! - **One authority query per connection in the steady state.** Movement
//!   is evaluated every tick for every actor; the per-actor
//!   [`FreezeCache`] turns that load into a map read. Transitions
//!   ([`ActionGate::invalidate`]) are the only events that refresh it, and
//!   an answer that crosses a disconnect is discarded, so a reconnect
//!   always resolves against the live session.
//! - **No caller-visible errors.** `evaluate` always returns a `Decision`;
//!   outages and lifecycle bugs are logged and counted, never thrown.
//! - **Caller-supplied time.** Policy never reads the wall clock; callers
//!   pass `now_ms`, which keeps reminder throttling deterministic under
//!   test.
//!
//! All per-actor state is internally synchronized; call sites share one
//! gate behind an `Arc` without any locking of their own.
//!
//! # Example
//!
//! ```
//! use airlock_gate::{ActionGate, Authority, AuthorityError};
//! use airlock_types::{ActorId, Decision, PlayerAction};
//! use std::sync::Arc;
//!
//! /// Authority that accepts everyone, for illustration only.
//! struct OpenDoor;
//!
//! impl Authority for OpenDoor {
//!     fn should_freeze(&self, _actor: &ActorId) -> Result<bool, AuthorityError> {
//!         Ok(false)
//!     }
//!     fn is_authenticated(&self, _actor: &ActorId) -> Result<bool, AuthorityError> {
//!         Ok(true)
//!     }
//! }
//!
//! let gate = ActionGate::new(Arc::new(OpenDoor));
//! let actor = ActorId::random();
//! gate.on_connect(&actor);
//! assert_eq!(gate.evaluate(&actor, &PlayerAction::Chat, 0), Decision::Allow);
//! gate.on_disconnect(&actor);
//! ```

pub mod authority;
pub mod cache;
pub mod commands;
pub mod gate;
pub mod metrics;
pub mod throttle;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod policy_tests;

pub use authority::{Authority, AuthorityError};
pub use cache::FreezeCache;
pub use commands::{is_auth_command, normalize_command};
pub use gate::ActionGate;
pub use metrics::{GateMetrics, GateMetricsSnapshot};
pub use throttle::ReminderThrottle;
