//! Property-based tests for the session state machine.
//!
//! Arbitrary interleavings of notifications, frames, and commands must keep
//! the roster invariants intact, never panic, and release every frame.

use confer_core::{ChannelRequest, ConnectionStatus, Session, SessionAction, SessionConfig};
use confer_harness::{InvariantRegistry, ReleaseCounter, SessionSnapshot, notify};
use confer_proto::ParticipantId;
use proptest::prelude::*;

const IDS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Step {
    ServerReached,
    Connected,
    ConnectFailed,
    JoinedChannel,
    JoinFailed,
    LeftChannel,
    UserConnected { id: usize, is_self: bool },
    UserDisconnected { id: usize },
    Message { id: usize, at: i64 },
    ChannelState { entries: Vec<(usize, i64)> },
    Frame { id: usize, width: u32, height: u32, short: bool },
    Connect,
    Join,
    Leave,
    Send,
    Volume { id: usize, volume: f32 },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let id = 0..IDS.len();
    prop_oneof![
        2 => Just(Step::ServerReached),
        2 => Just(Step::Connected),
        1 => Just(Step::ConnectFailed),
        2 => Just(Step::JoinedChannel),
        1 => Just(Step::JoinFailed),
        1 => Just(Step::LeftChannel),
        4 => (id.clone(), prop::bool::weighted(0.3))
            .prop_map(|(id, is_self)| Step::UserConnected { id, is_self }),
        2 => id.clone().prop_map(|id| Step::UserDisconnected { id }),
        2 => (id.clone(), 0i64..1_000).prop_map(|(id, at)| Step::Message { id, at }),
        1 => prop::collection::vec((id.clone(), 0i64..1_000), 0..5)
            .prop_map(|entries| Step::ChannelState { entries }),
        3 => (id.clone(), 0u32..4, 0u32..4, prop::bool::weighted(0.2))
            .prop_map(|(id, width, height, short)| Step::Frame { id, width, height, short }),
        2 => Just(Step::Connect),
        2 => Just(Step::Join),
        1 => Just(Step::Leave),
        1 => Just(Step::Send),
        1 => (id, -1.0f32..2.0).prop_map(|(id, volume)| Step::Volume { id, volume }),
    ]
}

fn apply(session: &mut Session, frames: &ReleaseCounter, step: &Step) -> Vec<SessionAction> {
    match step {
        Step::ServerReached => session.handle_raw_notification(&notify::connected_to_server()),
        Step::Connected => session.handle_raw_notification(&notify::connected()),
        Step::ConnectFailed => session.handle_raw_notification(&notify::connect_failed("x")),
        Step::JoinedChannel => session.handle_raw_notification(&notify::joined_channel()),
        Step::JoinFailed => session.handle_raw_notification(&notify::join_channel_failed("x")),
        Step::LeftChannel => session.handle_raw_notification(&notify::left_channel()),
        Step::UserConnected { id, is_self } => {
            session.handle_raw_notification(&notify::user_connected(IDS[*id], "n", *is_self))
        },
        Step::UserDisconnected { id } => {
            session.handle_raw_notification(&notify::user_disconnected(IDS[*id]))
        },
        Step::Message { id, at } => {
            session.handle_raw_notification(&notify::message(IDS[*id], "m", *at))
        },
        Step::ChannelState { entries } => {
            let entries: Vec<_> = entries.iter().map(|(id, at)| (IDS[*id], "m", *at)).collect();
            session.handle_raw_notification(&notify::channel_state(&entries))
        },
        Step::Frame { id, width, height, short } => {
            let frame = if *short { frames.frame(1, 0) } else { frames.rgba(*width, *height, 7) };
            session.handle_raw_frame(&notify::frame_metadata(IDS[*id], *width, *height), frame)
        },
        Step::Connect => session.connect(),
        Step::Join => session.join_channel(ChannelRequest::default()),
        Step::Leave => session.leave_channel(),
        Step::Send => session.send_message("hello"),
        Step::Volume { id, volume } => {
            session.set_audio_volume(&ParticipantId::from(IDS[*id]), *volume)
        },
    }
}

proptest! {
    #[test]
    fn prop_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let registry = InvariantRegistry::standard();
        let frames = ReleaseCounter::new();
        let mut session = Session::new(SessionConfig::default());
        session.initialize();

        for (i, step) in steps.iter().enumerate() {
            apply(&mut session, &frames, step);
            let snapshot = SessionSnapshot::from_session(&session);
            prop_assert!(
                registry.check_all(&snapshot).is_ok(),
                "step {i} {step:?} broke invariants: {snapshot:?}"
            );
        }

        prop_assert!(frames.all_released(), "{} of {} frames released", frames.released(), frames.issued());
    }

    #[test]
    fn prop_commands_only_in_allowed_states(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let frames = ReleaseCounter::new();
        let mut session = Session::new(SessionConfig::default());
        session.initialize();

        for step in &steps {
            let before = session.state();
            let sent = apply(&mut session, &frames, step)
                .iter()
                .any(|a| a.as_command().is_some());

            let allowed = match step {
                Step::Connect => before == ConnectionStatus::ReadyToConnect,
                Step::ServerReached => {
                    matches!(before, ConnectionStatus::Unknown | ConnectionStatus::Disconnected)
                },
                Step::Join => before == ConnectionStatus::Connected,
                Step::Leave | Step::Send | Step::Volume { .. } => {
                    before == ConnectionStatus::JoinedChannel
                },
                _ => false,
            };
            prop_assert!(!sent || allowed, "{step:?} sent a command in {before}");
        }
    }

    #[test]
    fn prop_volume_percent_in_range(volume in proptest::num::f32::ANY) {
        let mut session = Session::new(SessionConfig::default());
        session.initialize();
        session.handle_raw_notification(&notify::connected_to_server());
        session.handle_raw_notification(&notify::connected());
        session.join_channel(ChannelRequest::default());
        session.handle_raw_notification(&notify::joined_channel());

        for action in session.set_audio_volume(&ParticipantId::from("x"), volume) {
            if let Some(confer_proto::TransportCommand::SetAudioVolume { volume: pct, .. }) = action.as_command() {
                prop_assert!(*pct <= 100);
            }
        }
    }
}
