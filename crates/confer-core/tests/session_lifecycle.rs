//! Connection and channel lifecycle tests.
//!
//! Drives a session with transport notification JSON and checks state
//! transitions, command gating, and event order.

use confer_core::{
    ChannelRequest, ConnectionStatus, Session, SessionAction, SessionConfig, SessionEvent,
};
use confer_harness::notify;
use confer_proto::{ParticipantId, TransportCommand, UserInfo};

fn config() -> SessionConfig {
    SessionConfig::default().with_app_key("app key")
}

fn commands(actions: &[SessionAction]) -> Vec<TransportCommand> {
    actions.iter().filter_map(SessionAction::as_command).cloned().collect()
}

fn events(actions: &[SessionAction]) -> Vec<SessionEvent> {
    actions.iter().filter_map(SessionAction::as_event).cloned().collect()
}

/// Session driven to `Connected` with auto-connect.
fn connected() -> Session {
    let mut session = Session::new(config());
    session.initialize();
    session.handle_raw_notification(&notify::connected_to_server());
    session.handle_raw_notification(&notify::connected());
    assert_eq!(session.state(), ConnectionStatus::Connected);
    session
}

/// Session inside the default channel with `me` as self.
fn joined() -> Session {
    let mut session = connected();
    session.join_channel(ChannelRequest::default());
    session.handle_raw_notification(&notify::joined_channel());
    session.handle_raw_notification(&notify::user_connected("me", "Me", true));
    assert_eq!(session.state(), ConnectionStatus::JoinedChannel);
    session
}

#[test]
fn initialize_sends_init_once() {
    let mut session = Session::new(config());
    assert_eq!(session.state(), ConnectionStatus::Unknown);

    assert_eq!(commands(&session.initialize()), [TransportCommand::Init]);
    assert_eq!(session.state(), ConnectionStatus::Disconnected);
    assert!(session.initialize().is_empty());
}

#[test]
fn auto_connect_on_server_reached() {
    let mut session = Session::new(config());
    session.initialize();

    let actions = session.handle_raw_notification(&notify::connected_to_server());

    assert_eq!(commands(&actions), [TransportCommand::Connect { app_key: "appkey".into() }]);
    assert_eq!(session.state(), ConnectionStatus::Connecting);
}

#[test]
fn manual_connect_waits_for_caller() {
    let config = SessionConfig { auto_connect: false, ..config() };
    let mut session = Session::new(config);
    session.initialize();

    assert!(session.connect().is_empty(), "connect before server reached");
    assert!(session.handle_raw_notification(&notify::connected_to_server()).is_empty());
    assert_eq!(session.state(), ConnectionStatus::ReadyToConnect);

    let actions = session.connect();
    assert_eq!(commands(&actions).len(), 1);
    assert_eq!(session.state(), ConnectionStatus::Connecting);
}

#[test]
fn connect_failure_returns_to_ready() {
    let mut session = Session::new(config());
    session.initialize();
    session.handle_raw_notification(&notify::connected_to_server());

    let actions = session.handle_raw_notification(&notify::connect_failed("bad key"));

    assert_eq!(events(&actions), [SessionEvent::ConnectFailed { reason: "bad key".into() }]);
    assert_eq!(session.state(), ConnectionStatus::ReadyToConnect);
}

#[test]
fn join_uses_defaults() {
    let mut session = connected();
    let actions = session.join_channel(ChannelRequest::default());

    assert_eq!(commands(&actions), [TransportCommand::JoinChannel {
        channel: "default".into(),
        is_private: false,
        password: String::new(),
    }]);
    assert_eq!(session.state(), ConnectionStatus::JoiningChannel);
}

#[test]
fn join_failure_returns_to_connected() {
    let mut session = connected();
    session.join_channel(ChannelRequest::named("room"));

    let actions = session.handle_raw_notification(&notify::join_channel_failed("full"));

    assert_eq!(events(&actions), [SessionEvent::ChannelJoinFailed { reason: "full".into() }]);
    assert_eq!(session.state(), ConnectionStatus::Connected);
}

#[test]
fn leave_waits_for_confirmation() {
    let mut session = joined();

    assert_eq!(commands(&session.leave_channel()), [TransportCommand::LeaveChannel]);
    assert_eq!(session.state(), ConnectionStatus::JoinedChannel);

    let actions = session.handle_raw_notification(&notify::left_channel());
    assert_eq!(events(&actions), [SessionEvent::ChannelLeft]);
    assert_eq!(session.state(), ConnectionStatus::Connected);
}

#[test]
fn channel_commands_gated_outside_channel() {
    let mut session = connected();
    let target = ParticipantId::from("peer");

    assert!(session.send_message("hi").is_empty());
    assert!(session.set_mute_audio(true).is_empty());
    assert!(session.set_mute_video(true).is_empty());
    assert!(session.set_audio_volume(&target, 0.5).is_empty());
    assert!(session.leave_channel().is_empty());
    assert!(session.connect().is_empty());
    assert_eq!(session.state(), ConnectionStatus::Connected);
}

#[test]
fn channel_commands_inside_channel() {
    let session = joined();
    let target = ParticipantId::from("peer");

    assert_eq!(commands(&session.send_message("hi")), [TransportCommand::SendMessage {
        text: "hi".into()
    }]);
    assert_eq!(commands(&session.set_mute_audio(true)), [TransportCommand::SetMuteAudio {
        muted: true
    }]);
    assert_eq!(commands(&session.set_audio_volume(&target, 0.555)), [
        TransportCommand::SetAudioVolume { user_id: "peer".into(), volume: 55 }
    ]);
    assert_eq!(commands(&session.set_audio_volume(&target, 3.0)), [
        TransportCommand::SetAudioVolume { user_id: "peer".into(), volume: 100 }
    ]);
}

#[test]
fn media_stream_only_when_connected() {
    let mut session = Session::new(config());
    session.initialize();
    assert!(session.begin_media_stream(true, true).is_empty());

    let session = connected();
    assert_eq!(commands(&session.begin_media_stream(true, false)), [
        TransportCommand::BeginMediaStream { video: true, audio: false }
    ]);
    assert_eq!(session.state(), ConnectionStatus::Connected);

    let session = joined();
    assert!(session.begin_media_stream(false, true).is_empty());
}

#[test]
fn stream_outcome_events_in_any_state() {
    let mut session = Session::new(config());
    let began = session.handle_raw_notification(&notify::stream_began());
    let failed = session.handle_raw_notification(&notify::stream_failed("no camera"));

    assert_eq!(events(&began), [SessionEvent::StreamBegan]);
    assert_eq!(events(&failed), [SessionEvent::StreamFailed { reason: "no camera".into() }]);
}

#[test]
fn set_user_serializes_info_in_any_state() {
    let session = Session::new(config());
    let actions = session.set_user(&UserInfo::named("ada"));

    assert_eq!(commands(&actions), [TransportCommand::SetUser {
        user_info: r#"{"name":"ada"}"#.into()
    }]);
}

#[test]
fn out_of_order_notifications_dropped() {
    let mut session = Session::new(config());
    session.initialize();

    assert!(session.handle_raw_notification(&notify::connected()).is_empty());
    assert!(session.handle_raw_notification(&notify::joined_channel()).is_empty());
    assert!(session.handle_raw_notification(&notify::left_channel()).is_empty());
    assert_eq!(session.state(), ConnectionStatus::Disconnected);
}

#[test]
fn failure_status_and_garbage_ignored() {
    let mut session = connected();

    assert!(session.handle_raw_notification(&notify::envelope(false, "Connected", "")).is_empty());
    assert!(session.handle_raw_notification(&notify::envelope(true, "Nonsense", "")).is_empty());
    assert!(session.handle_raw_notification("not json").is_empty());
    assert!(session.handle_raw_notification(&notify::envelope(true, "UserConnected", "{")).is_empty());
    assert_eq!(session.state(), ConnectionStatus::Connected);
}

#[test]
fn self_disconnect_in_channel() {
    let mut session = joined();
    session.handle_raw_notification(&notify::user_connected("peer", "Peer", false));

    let actions = session.handle_raw_notification(&notify::user_disconnected("me"));
    let events = events(&actions);

    assert_eq!(session.state(), ConnectionStatus::ReadyToConnect);
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], SessionEvent::FrameUpdated { user_id: "me".into() });
    assert!(matches!(&events[1], SessionEvent::UserDisconnected(p) if p.is_self));
    assert!(matches!(&events[2], SessionEvent::RosterUpdated(list) if list.len() == 1));
    assert_eq!(events[3], SessionEvent::Disconnected);
    assert_eq!(session.roster().self_id(), None);
}

#[test]
fn self_disconnect_while_joining_emits_channel_left_first() {
    let mut session = connected();
    session.handle_raw_notification(&notify::user_connected("me", "Me", true));
    session.join_channel(ChannelRequest::default());
    assert_eq!(session.state(), ConnectionStatus::JoiningChannel);

    let events = events(&session.handle_raw_notification(&notify::user_disconnected("me")));

    assert_eq!(events.first(), Some(&SessionEvent::ChannelLeft));
    assert_eq!(events.last(), Some(&SessionEvent::Disconnected));
    assert_eq!(session.state(), ConnectionStatus::ReadyToConnect);
}

#[test]
fn peer_disconnect_keeps_state() {
    let mut session = joined();
    session.handle_raw_notification(&notify::user_connected("peer", "Peer", false));

    let events = events(&session.handle_raw_notification(&notify::user_disconnected("peer")));

    assert_eq!(events.len(), 3);
    assert!(!events.contains(&SessionEvent::Disconnected));
    assert_eq!(session.state(), ConnectionStatus::JoinedChannel);
}

#[test]
fn unknown_disconnect_is_dropped() {
    let mut session = joined();
    assert!(session.handle_raw_notification(&notify::user_disconnected("ghost")).is_empty());
    assert_eq!(session.roster().len(), 1);
}

#[test]
fn reconnect_after_self_disconnect() {
    let mut session = joined();
    session.handle_raw_notification(&notify::user_disconnected("me"));

    let actions = session.connect();
    assert_eq!(commands(&actions), [TransportCommand::Connect { app_key: "appkey".into() }]);
    assert_eq!(session.state(), ConnectionStatus::Connecting);
}
