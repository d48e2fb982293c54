//! End-to-end tests for the gate policy: category matrix, lifecycle,
//! throttling, fail-closed behavior, and concurrent access.

#[cfg(test)]
mod tests {
    use crate::authority::{Authority, AuthorityError};
    use crate::mocks::MockAuthority;
    use crate::ActionGate;
    use airlock_types::{
        ActorId, BlockPos, Decision, PlayerAction, Vec3, DEFAULT_REMINDER_TEXT,
    };
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Barrier, Mutex};

    fn gate_with_actor() -> (Arc<MockAuthority>, ActionGate<MockAuthority>, ActorId) {
        let authority = Arc::new(MockAuthority::new());
        let gate = ActionGate::new(authority.clone());
        let actor = ActorId::random();
        gate.on_connect(&actor);
        (authority, gate, actor)
    }

    fn one_action_per_variant() -> Vec<PlayerAction> {
        vec![
            PlayerAction::Move {
                to: Vec3::new(10.5, 64.0, -3.25),
            },
            PlayerAction::BreakBlock {
                position: BlockPos::new(10, 63, -3),
            },
            PlayerAction::PlaceBlock {
                position: BlockPos::new(10, 64, -3),
            },
            PlayerAction::TossItem { returnable: true },
            PlayerAction::PickUpItem,
            PlayerAction::InteractBlock {
                position: BlockPos::new(11, 64, -3),
            },
            PlayerAction::InteractItem,
            PlayerAction::Chat,
            PlayerAction::Command {
                line: "/home".into(),
            },
        ]
    }

    #[test]
    fn never_authenticated_actor_is_denied_every_category() {
        let (_authority, gate, actor) = gate_with_actor();

        for (idx, action) in one_action_per_variant().into_iter().enumerate() {
            let decision = gate.evaluate(&actor, &action, (idx as u64) * 10);
            assert!(
                decision.is_denied(),
                "frozen actor must not pass {action:?}, got {decision:?}"
            );
        }
    }

    #[test]
    fn login_transition_unfreezes_every_category() {
        let (authority, gate, actor) = gate_with_actor();

        assert!(gate
            .evaluate(&actor, &PlayerAction::Chat, 0)
            .is_denied());

        authority.grant(&actor);
        gate.invalidate(&actor);

        let mut actions = one_action_per_variant();
        actions.push(PlayerAction::TossItem { returnable: false });
        actions.push(PlayerAction::Command {
            line: "login again".into(),
        });
        for action in actions {
            assert_eq!(
                gate.evaluate(&actor, &action, 100),
                Decision::Allow,
                "no residual freeze after login for {action:?}"
            );
        }
    }

    #[test]
    fn auth_command_vectors_pass_the_filter_end_to_end() {
        let (_authority, gate, actor) = gate_with_actor();

        for allowed in ["login secret123", "/register secret123 secret123"] {
            assert_eq!(
                gate.evaluate(
                    &actor,
                    &PlayerAction::Command {
                        line: allowed.into()
                    },
                    0,
                ),
                Decision::Allow,
                "{allowed:?} must reach the authenticator"
            );
        }

        for denied in ["help", "/tp ~ ~10 ~", "LOGOUT"] {
            assert_eq!(
                gate.evaluate(
                    &actor,
                    &PlayerAction::Command { line: denied.into() },
                    0,
                ),
                Decision::DenyWithMessage(DEFAULT_REMINDER_TEXT.into()),
                "{denied:?} must be blocked with a reminder"
            );
        }
    }

    #[test]
    fn chat_attempts_2000_ms_apart_remind_once() {
        let (_authority, gate, actor) = gate_with_actor();

        let first = gate.evaluate(&actor, &PlayerAction::Chat, 1_000);
        let second = gate.evaluate(&actor, &PlayerAction::Chat, 3_000);

        assert_eq!(first, Decision::DenyWithMessage(DEFAULT_REMINDER_TEXT.into()));
        assert_eq!(second, Decision::Deny, "second chat within the window is silent");
    }

    #[test]
    fn chat_attempts_6000_ms_apart_remind_twice() {
        let (_authority, gate, actor) = gate_with_actor();

        let first = gate.evaluate(&actor, &PlayerAction::Chat, 1_000);
        let second = gate.evaluate(&actor, &PlayerAction::Chat, 7_000);

        assert!(first.message().is_some());
        assert!(
            second.message().is_some(),
            "a full window between chats earns a fresh reminder"
        );
    }

    #[test]
    fn command_denials_remind_every_time() {
        let (_authority, gate, actor) = gate_with_actor();

        for _ in 0..3 {
            let decision = gate.evaluate(
                &actor,
                &PlayerAction::Command {
                    line: "/help".into(),
                },
                500,
            );
            assert!(
                decision.message().is_some(),
                "command denials are not throttled"
            );
        }

        assert!(
            gate.evaluate(&actor, &PlayerAction::Chat, 600)
                .message()
                .is_some(),
            "command reminders must not consume the chat window"
        );
    }

    #[test]
    fn toss_policy_follows_returnability() {
        let (_authority, gate, actor) = gate_with_actor();

        assert_eq!(
            gate.evaluate(&actor, &PlayerAction::TossItem { returnable: true }, 0),
            Decision::Deny,
            "a returnable stack goes back to the inventory"
        );
        assert_eq!(
            gate.evaluate(&actor, &PlayerAction::TossItem { returnable: false }, 0),
            Decision::Allow,
            "an unreturnable stack must not be destroyed by a cancel"
        );
    }

    #[test]
    fn disconnect_clears_state_and_reconnect_requeries() {
        let (authority, gate, actor) = gate_with_actor();

        assert!(gate.is_frozen(&actor));
        assert!(gate
            .evaluate(&actor, &PlayerAction::Chat, 1_000)
            .message()
            .is_some());
        assert_eq!(authority.freeze_queries(), 1);

        gate.on_disconnect(&actor);
        gate.on_connect(&actor);

        assert!(gate.is_frozen(&actor), "reconnect starts frozen again");
        assert_eq!(
            authority.freeze_queries(),
            2,
            "reconnect must trigger a fresh authority query"
        );
        assert!(
            gate.evaluate(&actor, &PlayerAction::Chat, 1_500)
                .message()
                .is_some(),
            "reminder window must not survive a reconnect"
        );
    }

    /// Authority that parks its next freeze query between computing the
    /// answer and returning it, so lifecycle calls can land in the window.
    struct StallingAuthority {
        sessions: Mutex<HashSet<ActorId>>,
        stall_next: AtomicBool,
        entered: Barrier,
        resume: Barrier,
        freeze_queries: AtomicU64,
    }

    impl StallingAuthority {
        fn new() -> Self {
            Self {
                sessions: Mutex::new(HashSet::new()),
                stall_next: AtomicBool::new(false),
                entered: Barrier::new(2),
                resume: Barrier::new(2),
                freeze_queries: AtomicU64::new(0),
            }
        }

        fn open_session(&self, actor: &ActorId) {
            self.sessions.lock().expect("sessions lock").insert(*actor);
        }

        fn close_session(&self, actor: &ActorId) {
            self.sessions.lock().expect("sessions lock").remove(actor);
        }

        fn stall_next_query(&self) {
            self.stall_next.store(true, Ordering::SeqCst);
        }
    }

    impl Authority for StallingAuthority {
        fn should_freeze(&self, actor: &ActorId) -> Result<bool, AuthorityError> {
            self.freeze_queries.fetch_add(1, Ordering::SeqCst);
            let frozen = !self.sessions.lock().expect("sessions lock").contains(actor);
            if self.stall_next.swap(false, Ordering::SeqCst) {
                self.entered.wait();
                self.resume.wait();
            }
            Ok(frozen)
        }

        fn is_authenticated(&self, actor: &ActorId) -> Result<bool, AuthorityError> {
            Ok(self.sessions.lock().expect("sessions lock").contains(actor))
        }
    }

    #[test]
    fn reconnect_never_inherits_an_answer_from_the_previous_session() {
        let authority = Arc::new(StallingAuthority::new());
        let gate = ActionGate::new(authority.clone());
        let actor = ActorId::random();

        authority.open_session(&actor);
        gate.on_connect(&actor);
        authority.stall_next_query();

        std::thread::scope(|scope| {
            let lookup = scope.spawn(|| {
                gate.evaluate(
                    &actor,
                    &PlayerAction::BreakBlock {
                        position: BlockPos::new(0, 64, 0),
                    },
                    0,
                )
            });

            authority.entered.wait();
            // The query now holds the authenticated session's answer. The
            // session ends and the actor reconnects before it returns.
            authority.close_session(&actor);
            gate.on_disconnect(&actor);
            gate.on_connect(&actor);
            authority.resume.wait();

            assert_eq!(
                lookup.join().expect("lookup thread"),
                Decision::Deny,
                "the old connection's event must not pass on a dead session"
            );
        });

        assert_eq!(
            gate.cached_freeze_state(&actor),
            None,
            "the dead session's answer must not be cached for the new connection"
        );
        assert!(
            gate.is_frozen(&actor),
            "the reconnect resolves against the live session"
        );
        assert_eq!(
            authority.freeze_queries.load(Ordering::SeqCst),
            2,
            "the reconnect performs its own authority query"
        );
    }

    #[test]
    fn invalidate_is_idempotent_per_transition() {
        let (authority, gate, actor) = gate_with_actor();

        authority.grant(&actor);
        gate.invalidate(&actor);
        assert_eq!(gate.cached_freeze_state(&actor), Some(false));
        gate.invalidate(&actor);
        assert_eq!(
            gate.cached_freeze_state(&actor),
            Some(false),
            "repeating the login invalidation must not change the value"
        );

        authority.revoke(&actor);
        gate.invalidate(&actor);
        gate.invalidate(&actor);
        assert_eq!(
            gate.cached_freeze_state(&actor),
            Some(true),
            "repeating the expiry invalidation must not change the value"
        );
    }

    #[test]
    fn authority_outage_fails_closed() {
        let (authority, gate, actor) = gate_with_actor();
        authority.set_unreachable(true);

        assert!(gate.is_frozen(&actor), "no cache entry plus outage means frozen");
        assert_eq!(
            gate.evaluate(
                &actor,
                &PlayerAction::Move {
                    to: Vec3::new(1.0, 2.0, 3.0)
                },
                0,
            ),
            Decision::Deny
        );
        assert_eq!(
            gate.cached_freeze_state(&actor),
            None,
            "outage answers are never cached"
        );
    }

    #[test]
    fn outage_after_login_keeps_cached_access() {
        let (authority, gate, actor) = gate_with_actor();

        authority.grant(&actor);
        gate.invalidate(&actor);
        authority.set_unreachable(true);

        assert_eq!(
            gate.evaluate(&actor, &PlayerAction::Chat, 0),
            Decision::Allow,
            "an authenticated actor keeps acting through an outage via the cache"
        );
    }

    #[test]
    fn unknown_actor_is_frozen_and_flagged() {
        let authority = Arc::new(MockAuthority::new());
        let gate = ActionGate::new(authority.clone());
        let ghost = ActorId::random();

        assert!(gate.evaluate(&ghost, &PlayerAction::Chat, 0).is_denied());
        assert!(gate.is_frozen(&ghost));
        assert!(
            gate.metrics_snapshot().unknown_actor_queries >= 2,
            "lifecycle bugs must be observable"
        );
        assert_eq!(
            authority.freeze_queries(),
            0,
            "an unknown actor never reaches the authority"
        );

        gate.invalidate(&ghost);
        assert_eq!(
            gate.tracked_actors(),
            0,
            "transitions for unknown actors must not leak cache entries"
        );
    }

    #[test]
    fn ghost_chat_is_silent_and_leaves_no_reminder_state() {
        let authority = Arc::new(MockAuthority::new());
        let gate = ActionGate::new(authority);
        let ghost = ActorId::random();

        assert_eq!(gate.evaluate(&ghost, &PlayerAction::Chat, 0), Decision::Deny);
        assert_eq!(
            gate.evaluate(&ghost, &PlayerAction::Chat, 10_000),
            Decision::Deny,
            "no reminder window ever opens without a connect record"
        );
        assert_eq!(
            gate.throttled_actors(),
            0,
            "chat from an unknown actor must not leave state behind"
        );
        assert_eq!(gate.metrics_snapshot().reminders_sent, 0);
        assert_eq!(gate.metrics_snapshot().unknown_actor_queries, 2);
    }

    #[test]
    fn duplicate_connect_resets_gate_state() {
        let (authority, gate, actor) = gate_with_actor();

        assert!(gate.is_frozen(&actor));
        assert_eq!(authority.freeze_queries(), 1);

        gate.on_connect(&actor);
        assert!(gate.is_frozen(&actor));
        assert_eq!(
            authority.freeze_queries(),
            2,
            "a duplicate connect drops the stale cache entry"
        );
    }

    #[test]
    fn custom_reminder_text_is_delivered_verbatim() {
        let authority = Arc::new(MockAuthority::new());
        let gate =
            ActionGate::with_reminder_text(authority, "Log in first: /login <password>");
        let actor = ActorId::random();
        gate.on_connect(&actor);

        assert_eq!(
            gate.evaluate(&actor, &PlayerAction::Chat, 0),
            Decision::DenyWithMessage("Log in first: /login <password>".into())
        );
    }

    #[test]
    fn metrics_snapshot_reflects_decisions() {
        let (authority, gate, actor) = gate_with_actor();

        gate.evaluate(
            &actor,
            &PlayerAction::Move {
                to: Vec3::new(0.0, 64.0, 0.0),
            },
            0,
        );
        gate.evaluate(&actor, &PlayerAction::Chat, 0);
        gate.evaluate(
            &actor,
            &PlayerAction::Command {
                line: "/home".into(),
            },
            0,
        );
        authority.grant(&actor);
        gate.invalidate(&actor);
        gate.evaluate(&actor, &PlayerAction::Chat, 10_000);

        let snapshot = gate.metrics_snapshot();
        assert_eq!(snapshot.evaluations, 4);
        assert_eq!(snapshot.allowed, 1);
        assert_eq!(snapshot.denied_movement, 1);
        assert_eq!(snapshot.denied_chat, 1);
        assert_eq!(snapshot.denied_command, 1);
        assert_eq!(snapshot.denied_total(), 3);
        assert_eq!(snapshot.reminders_sent, 2, "chat and command each reminded once");
        assert_eq!(snapshot.cache_refreshes, 1);
        assert_eq!(snapshot.unknown_actor_queries, 0);
    }

    #[test]
    fn concurrent_first_lookups_converge_to_one_entry() {
        let (authority, gate, actor) = gate_with_actor();
        let workers = 8;
        let barrier = Barrier::new(workers);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    barrier.wait();
                    assert!(gate.is_frozen(&actor), "every racer sees frozen");
                });
            }
        });

        assert_eq!(gate.tracked_actors(), 1, "racing lookups converge to one entry");
        let queries = authority.freeze_queries();
        assert!(
            (1..=workers as u64).contains(&queries),
            "racers may each query once, got {queries}"
        );
    }

    #[test]
    fn concurrent_sweep_survives_transition_churn() {
        let (authority, gate, actor) = gate_with_actor();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for tick in 0u64..400 {
                    let _ = gate.evaluate(
                        &actor,
                        &PlayerAction::Move {
                            to: Vec3::new(tick as f64, 64.0, 0.0),
                        },
                        tick * 50,
                    );
                }
            });
            scope.spawn(|| {
                for round in 0..40 {
                    if round % 2 == 0 {
                        authority.grant(&actor);
                    } else {
                        authority.revoke(&actor);
                    }
                    gate.invalidate(&actor);
                }
            });
            scope.spawn(|| {
                for tick in 0u64..200 {
                    let _ = gate.evaluate(&actor, &PlayerAction::Chat, tick * 100);
                }
            });
        });

        authority.grant(&actor);
        gate.invalidate(&actor);
        assert_eq!(
            gate.evaluate(&actor, &PlayerAction::Chat, 1_000_000),
            Decision::Allow,
            "gate state must be coherent after concurrent churn"
        );
        assert_eq!(
            gate.metrics_snapshot().unknown_actor_queries,
            0,
            "no lifecycle diagnostics expected for a connected actor"
        );
    }
}
