//! Property-based tests for machine evaluation.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated event sequences.

use machina::config::StateNode;
use machina::core::Context;
use machina::runtime::{EventInput, NullSink, SendResult};
use machina::{context_struct, event_enum, state_enum, Machine, MachineConfig, Transition};
use proptest::prelude::*;

state_enum! {
    enum Player {
        Stopped,
        Playing,
        Paused,
    }
}

event_enum! {
    enum Control {
        Play,
        Pause,
        Stop,
        Seek,
    }
}

context_struct! {
    struct Track {
        position: u32,
        plays: u32,
    }
    patch: TrackPatch
}

const TRACK_LENGTH: u32 = 300;

type Node = StateNode<Player, Control, Track, u32>;
type Edge = Transition<Player, Track, u32>;

fn seek() -> Edge {
    Edge::to(Player::Playing)
        .when(|_, to| to.is_some_and(|to| *to <= TRACK_LENGTH))
        .action(|_, to| {
            Some(TrackPatch {
                position: to.copied(),
                ..Default::default()
            })
        })
}

fn player() -> Machine<Player, Control, Track, u32> {
    let config = MachineConfig::builder()
        .initial(Player::Stopped)
        .state(
            Player::Stopped,
            Node::new().on(Control::Play, Player::Playing).exit(|track, _| {
                Some(TrackPatch {
                    plays: Some(track.plays + 1),
                    ..Default::default()
                })
            }),
        )
        .state(
            Player::Playing,
            Node::new()
                .on(Control::Pause, Player::Paused)
                .on(Control::Seek, seek())
                .on(
                    Control::Stop,
                    Edge::to(Player::Stopped).action(|_, _| {
                        Some(TrackPatch {
                            position: Some(0),
                            ..Default::default()
                        })
                    }),
                ),
        )
        .state(
            Player::Paused,
            Node::new()
                .on(Control::Play, Player::Playing)
                .on(Control::Seek, seek())
                .on(Control::Stop, Player::Stopped),
        )
        .record_history(64)
        .build()
        .unwrap();

    Machine::new(config).with_diagnostics(NullSink)
}

prop_compose! {
    fn arbitrary_control()(variant in 0..4u8) -> Control {
        match variant {
            0 => Control::Play,
            1 => Control::Pause,
            2 => Control::Stop,
            _ => Control::Seek,
        }
    }
}

prop_compose! {
    fn arbitrary_input()(
        control in arbitrary_control(),
        payload in proptest::option::of(0..400u32),
    ) -> EventInput<Control, u32> {
        EventInput { event: control, payload }
    }
}

fn run(inputs: &[EventInput<Control, u32>]) -> (Machine<Player, Control, Track, u32>, usize) {
    let mut machine = player();
    let taken = inputs
        .iter()
        .filter(|input| machine.send((*input).clone()).is_transitioned())
        .count();
    (machine, taken)
}

proptest! {
    #[test]
    fn send_is_deterministic(inputs in prop::collection::vec(arbitrary_input(), 0..40)) {
        let (first, _) = run(&inputs);
        let (second, _) = run(&inputs);

        prop_assert_eq!(first.current_state(), second.current_state());
        prop_assert_eq!(first.context(), second.context());
    }

    #[test]
    fn unhandled_event_is_a_no_op(
        inputs in prop::collection::vec(arbitrary_input(), 0..20),
        next in arbitrary_input(),
    ) {
        let (mut machine, _) = run(&inputs);
        let handled = machine
            .config()
            .state(machine.current_state())
            .and_then(|node| node.transition(&next.event))
            .is_some();
        prop_assume!(!handled);

        let state = *machine.current_state();
        let context = machine.context().clone();
        let count = machine.metadata().transition_count;

        prop_assert_eq!(machine.send(next), SendResult::Unhandled);
        prop_assert_eq!(machine.current_state(), &state);
        prop_assert_eq!(machine.context(), &context);
        prop_assert_eq!(machine.metadata().transition_count, count);
    }

    #[test]
    fn rejected_guard_is_a_no_op(
        inputs in prop::collection::vec(arbitrary_input(), 0..20),
        beyond in (TRACK_LENGTH + 1)..1000u32,
    ) {
        let (mut machine, _) = run(&inputs);
        prop_assume!(!machine.matches(&Player::Stopped));

        let state = *machine.current_state();
        let context = machine.context().clone();

        let result = machine.send(EventInput::with_payload(Control::Seek, beyond));

        prop_assert_eq!(result, SendResult::GuardRejected);
        prop_assert_eq!(machine.current_state(), &state);
        prop_assert_eq!(machine.context(), &context);
    }

    #[test]
    fn matches_is_pure(inputs in prop::collection::vec(arbitrary_input(), 0..20)) {
        let (machine, _) = run(&inputs);
        let context = machine.context().clone();

        let first: Vec<bool> = [Player::Stopped, Player::Playing, Player::Paused]
            .iter()
            .map(|state| machine.matches(state))
            .collect();
        let second: Vec<bool> = [Player::Stopped, Player::Playing, Player::Paused]
            .iter()
            .map(|state| machine.matches(state))
            .collect();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.iter().filter(|hit| **hit).count(), 1);
        prop_assert_eq!(machine.context(), &context);
    }

    #[test]
    fn history_path_follows_transitions(inputs in prop::collection::vec(arbitrary_input(), 1..40)) {
        let (machine, taken) = run(&inputs);
        let history = machine.history();

        prop_assert_eq!(history.len(), taken);
        prop_assert_eq!(machine.metadata().transition_count, taken as u64);

        let transitions: Vec<_> = history.transitions().collect();
        for pair in transitions.windows(2) {
            prop_assert_eq!(&pair[0].to, &pair[1].from);
        }

        if let Some(last) = history.last() {
            prop_assert_eq!(&last.to, machine.current_state());
            prop_assert_eq!(history.get_path().len(), taken + 1);
        }
    }

    #[test]
    fn plays_count_exits_from_stopped(inputs in prop::collection::vec(arbitrary_input(), 0..40)) {
        let (machine, _) = run(&inputs);

        let exits = machine
            .history()
            .transitions()
            .filter(|t| t.from == Player::Stopped)
            .count();

        prop_assert_eq!(machine.context().plays as usize, exits);
    }

    #[test]
    fn empty_patch_merge_is_identity(position in any::<u32>(), plays in any::<u32>()) {
        let mut track = Track { position, plays };
        track.merge(TrackPatch::default());

        prop_assert_eq!(track, Track { position, plays });
    }
}
