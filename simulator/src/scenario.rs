//! Deterministic scenario driver.
//!
//! A scenario wires a [`World`], a [`TableAuthority`], the gate, and the
//! guard set together the way a live server would, then replays a seeded
//! schedule of gameplay events tick by tick. Time is simulated: each tick
//! advances the scenario clock by a fixed interval and every guard call
//! reads that clock, so runs with equal configs produce equal summaries.

use crate::authority::TableAuthority;
use crate::dispatch::EventPipeline;
use crate::world::{RecordingMessenger, World, DEFAULT_INVENTORY_CAPACITY};
use airlock_gate::{ActionGate, Authority};
use airlock_hooks::{
    dispatch_priority, BlockBreakEvent, BlockPlaceEvent, ChatEvent, CommandEvent, EventRuling,
    GateHooks, HookPriority, InteractEvent, InteractTarget, ItemPickupEvent, ItemTossEvent,
    MovementEvent, MovementRuling, TossRuling, Messenger,
};
use airlock_types::{ActionCategory, ActorId, BlockPos, ItemStack, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const DEFAULT_ACTORS: usize = 4;
pub const DEFAULT_TICKS: u64 = 40;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_LOGIN_AFTER_TICKS: u64 = 10;

/// Simulated wall clock, advanced once per tick by the driver and read
/// by every listener that needs a timestamp.
#[derive(Debug, Default)]
pub struct SimClock {
    now_ms: AtomicU64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }

    pub fn advance_to(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::Relaxed);
    }
}

/// Scenario knobs. Unset fields fall back to the `DEFAULT_*` constants.
#[derive(Clone, Debug, Default)]
pub struct HarnessConfig {
    pub actors: Option<usize>,
    pub ticks: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub seed: Option<u64>,
    pub login_after_ticks: Option<u64>,
    /// First tick of an injected authority outage (inclusive).
    pub outage_from_tick: Option<u64>,
    /// Tick at which the injected outage ends (exclusive). An open end
    /// keeps the outage running until the scenario stops.
    pub outage_until_tick: Option<u64>,
}

impl HarnessConfig {
    pub fn actors(&self) -> usize {
        self.actors.unwrap_or(DEFAULT_ACTORS)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.unwrap_or(DEFAULT_TICKS)
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS)
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn login_after_ticks(&self) -> u64 {
        self.login_after_ticks.unwrap_or(DEFAULT_LOGIN_AFTER_TICKS)
    }
}

/// Counters collected over one run. Equal configs yield equal summaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    pub actors: usize,
    pub ticks: u64,
    pub evaluations: u64,
    pub allowed: u64,
    pub denied: u64,
    pub reminders_sent: u64,
    pub authority_failures: u64,
    pub commands_executed: u64,
    pub chats_delivered: u64,
    pub stacks_dropped: u64,
    pub stacks_restored: u64,
    pub authenticated_at_end: usize,
}

pub struct Scenario {
    config: HarnessConfig,
    world: Arc<World>,
    authority: Arc<TableAuthority>,
    gate: Arc<ActionGate<TableAuthority>>,
    hooks: Arc<GateHooks<TableAuthority, RecordingMessenger>>,
    clock: Arc<SimClock>,
    commands: EventPipeline<CommandEvent>,
    chats: EventPipeline<ChatEvent>,
    commands_executed: Arc<AtomicU64>,
    chats_delivered: Arc<AtomicU64>,
    rng: StdRng,
}

impl Scenario {
    pub fn new(config: HarnessConfig) -> Self {
        let world = Arc::new(World::new());
        let authority = Arc::new(TableAuthority::new());
        let messenger = Arc::new(RecordingMessenger::new());
        let gate = Arc::new(ActionGate::new(authority.clone()));
        let hooks = Arc::new(GateHooks::new(gate.clone(), messenger.clone()));
        let clock = Arc::new(SimClock::new());
        let commands_executed = Arc::new(AtomicU64::new(0));
        let chats_delivered = Arc::new(AtomicU64::new(0));

        let mut commands = EventPipeline::new();
        {
            let hooks = hooks.clone();
            let clock = clock.clone();
            commands.register(
                dispatch_priority(ActionCategory::Command),
                move |event: &CommandEvent| hooks.on_command(event, clock.now_ms()),
            );
        }
        {
            let authority = authority.clone();
            let hooks = hooks.clone();
            let messenger = messenger.clone();
            let executed = commands_executed.clone();
            commands.register(HookPriority::Normal, move |event: &CommandEvent| {
                executed.fetch_add(1, Ordering::Relaxed);
                run_command(&authority, &hooks, &messenger, event);
                EventRuling::Proceed
            });
        }

        let mut chats = EventPipeline::new();
        {
            let hooks = hooks.clone();
            let clock = clock.clone();
            chats.register(
                dispatch_priority(ActionCategory::Chat),
                move |event: &ChatEvent| hooks.on_chat(event, clock.now_ms()),
            );
        }
        {
            let delivered = chats_delivered.clone();
            chats.register(HookPriority::Normal, move |_: &ChatEvent| {
                delivered.fetch_add(1, Ordering::Relaxed);
                EventRuling::Proceed
            });
        }

        let rng = StdRng::seed_from_u64(config.seed());
        Self {
            config,
            world,
            authority,
            gate,
            hooks,
            clock,
            commands,
            chats,
            commands_executed,
            chats_delivered,
            rng,
        }
    }

    /// Gate handle for status endpoints; safe to hold across the run.
    pub fn gate(&self) -> Arc<ActionGate<TableAuthority>> {
        self.gate.clone()
    }

    pub fn run(mut self) -> ScenarioSummary {
        let actor_count = self.config.actors();
        let ticks = self.config.ticks();
        let tick_interval = self.config.tick_interval_ms();
        let login_tick = self.config.login_after_ticks();

        let actors: Vec<ActorId> = (0..actor_count)
            .map(|index| {
                let spawn = Vec3::new(index as f64 * 4.0, 64.0, 0.0);
                let actor =
                    self.world
                        .spawn(format!("actor-{index}"), spawn, DEFAULT_INVENTORY_CAPACITY);
                self.authority.on_connect(&actor);
                self.hooks.on_connect(&actor, spawn);
                actor
            })
            .collect();

        let mut stacks_dropped = 0u64;
        let mut stacks_restored = 0u64;

        for tick in 0..ticks {
            let now_ms = tick.saturating_mul(tick_interval);
            self.clock.advance_to(now_ms);
            self.apply_outage_window(tick);

            for (index, actor) in actors.iter().enumerate() {
                if tick == login_tick {
                    let line = format!("/register hunter-{index} hunter-{index}");
                    self.commands.dispatch(&CommandEvent {
                        actor: *actor,
                        line,
                    });
                    continue;
                }

                match self.rng.gen_range(0u32..100) {
                    0..=39 => self.step_movement(actor, now_ms),
                    40..=54 => {
                        self.chats.dispatch(&ChatEvent {
                            actor: *actor,
                            message: format!("tick {tick}"),
                        });
                    }
                    55..=64 => {
                        self.commands.dispatch(&CommandEvent {
                            actor: *actor,
                            line: "/home".to_string(),
                        });
                    }
                    65..=74 => {
                        let event = BlockBreakEvent {
                            actor: *actor,
                            position: self.random_block(),
                        };
                        let _ = self.hooks.on_block_break(&event, now_ms);
                    }
                    75..=82 => {
                        let event = BlockPlaceEvent {
                            actor: *actor,
                            position: self.random_block(),
                        };
                        let _ = self.hooks.on_block_place(&event, now_ms);
                    }
                    83..=89 => self.step_pickup(actor, now_ms),
                    90..=94 => {
                        let target = if self.rng.gen_bool(0.5) {
                            InteractTarget::Block(self.random_block())
                        } else {
                            InteractTarget::HeldItem
                        };
                        let event = InteractEvent {
                            actor: *actor,
                            target,
                        };
                        let _ = self.hooks.on_interact(&event, now_ms);
                    }
                    _ => match self.step_toss(actor, now_ms) {
                        TossRuling::Proceed => stacks_dropped += 1,
                        TossRuling::CancelRestored => stacks_restored += 1,
                    },
                }
            }
        }

        let authenticated_at_end = actors
            .iter()
            .filter(|actor| matches!(self.authority.is_authenticated(actor), Ok(true)))
            .count();

        for actor in &actors {
            self.hooks.on_disconnect(actor);
            self.authority.on_disconnect(actor);
            self.world.despawn(actor);
        }

        let snapshot = self.gate.metrics_snapshot();
        ScenarioSummary {
            actors: actor_count,
            ticks,
            evaluations: snapshot.evaluations,
            allowed: snapshot.allowed,
            denied: snapshot.denied_total(),
            reminders_sent: snapshot.reminders_sent,
            authority_failures: snapshot.authority_failures,
            commands_executed: self.commands_executed.load(Ordering::Relaxed),
            chats_delivered: self.chats_delivered.load(Ordering::Relaxed),
            stacks_dropped,
            stacks_restored,
            authenticated_at_end,
        }
    }

    fn apply_outage_window(&self, tick: u64) {
        let Some(from) = self.config.outage_from_tick else {
            return;
        };
        let until = self.config.outage_until_tick.unwrap_or(u64::MAX);
        self.authority.set_outage(tick >= from && tick < until);
    }

    fn step_movement(&mut self, actor: &ActorId, now_ms: u64) {
        let Some(from) = self.world.position(actor) else {
            return;
        };
        let to = Vec3::new(
            from.x + self.rng.gen_range(-1.0..1.0),
            from.y,
            from.z + self.rng.gen_range(-1.0..1.0),
        );
        let event = MovementEvent {
            actor: *actor,
            from,
            to,
        };
        match self.hooks.on_movement(&event, now_ms) {
            MovementRuling::Proceed => self.world.set_position(actor, to),
            MovementRuling::ResetTo(position) => self.world.set_position(actor, position),
        }
    }

    fn step_pickup(&mut self, actor: &ActorId, now_ms: u64) {
        let stack = ItemStack::single(self.rng.gen_range(1u32..64));
        let event = ItemPickupEvent {
            actor: *actor,
            stack,
        };
        if self.hooks.on_item_pickup(&event, now_ms) == EventRuling::Proceed {
            let _ = self.world.give(actor, stack);
        }
    }

    fn step_toss(&mut self, actor: &ActorId, now_ms: u64) -> TossRuling {
        let stack = ItemStack::single(self.rng.gen_range(1u32..64));
        let event = ItemTossEvent {
            actor: *actor,
            stack,
        };
        self.hooks
            .on_item_toss(&event, self.world.as_ref(), now_ms)
    }

    fn random_block(&mut self) -> BlockPos {
        BlockPos::new(
            self.rng.gen_range(-16..16),
            64,
            self.rng.gen_range(-16..16),
        )
    }
}

/// Downstream command executor: what a server would run for commands the
/// gate let through. Auth commands drive real authenticator transitions.
fn run_command(
    authority: &TableAuthority,
    hooks: &GateHooks<TableAuthority, RecordingMessenger>,
    messenger: &RecordingMessenger,
    event: &CommandEvent,
) {
    let line = event.line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let mut parts = line.split_whitespace();
    let result = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        Some("register") => {
            let password = parts.next().unwrap_or("");
            let confirm = parts.next().unwrap_or("");
            authority.register(&event.actor, password, confirm)
        }
        Some("login") => authority.login(&event.actor, parts.next().unwrap_or("")),
        _ => {
            tracing::debug!(actor = %event.actor, line = %event.line, "command executed");
            return;
        }
    };
    match result {
        Ok(()) => hooks.on_login_success(&event.actor),
        Err(err) => messenger.send_system(&event.actor, &err.to_string()),
    }
}
