//! Runtime tests: inbound channel draining, action execution order, and the
//! spatial update loop.

use std::{
    sync::{Arc, Mutex},
    thread,
};

use confer_client::{NullTransport, Runtime};
use confer_core::{
    ChannelRequest, ConnectionStatus, Position, SessionConfig, SessionEvent, SpatialAudioConfig,
};
use confer_harness::{RecordingTransport, ReleaseCounter, notify};
use confer_proto::{ParticipantId, TransportCommand};

type Events = Arc<Mutex<Vec<SessionEvent>>>;

fn sink(events: &Events) -> impl FnMut(SessionEvent) + use<> {
    let events = Arc::clone(events);
    move |event| events.lock().unwrap().push(event)
}

fn config(spatial: bool) -> SessionConfig {
    SessionConfig {
        spatial: SpatialAudioConfig { enabled: spatial, ..SpatialAudioConfig::default() },
        ..SessionConfig::default().with_app_key("key")
    }
}

#[test]
fn new_initializes_transport() {
    let transport = RecordingTransport::new();
    let events = Events::default();
    let (runtime, _tx) = Runtime::new(config(false), transport.clone(), sink(&events));

    assert_eq!(transport.commands(), [TransportCommand::Init]);
    assert_eq!(runtime.session().state(), ConnectionStatus::Disconnected);
}

#[test]
fn pump_applies_in_delivery_order() {
    let transport = RecordingTransport::new();
    let events = Events::default();
    let (mut runtime, tx) = Runtime::new(config(false), transport.clone(), sink(&events));

    tx.notify(notify::connected_to_server()).unwrap();
    tx.notify(notify::connected()).unwrap();
    tx.notify(notify::user_connected("me", "Me", true)).unwrap();

    assert_eq!(runtime.pump(), 3);
    assert_eq!(runtime.session().state(), ConnectionStatus::Connected);
    assert_eq!(transport.take(), [
        TransportCommand::Init,
        TransportCommand::Connect { app_key: "key".into() }
    ]);

    let events = events.lock().unwrap();
    assert_eq!(events[0], SessionEvent::Connected);
    assert!(matches!(&events[1], SessionEvent::UserConnected(p) if p.is_self));
    assert!(matches!(&events[2], SessionEvent::RosterUpdated(_)));
}

#[test]
fn notifications_from_other_threads() {
    let events = Events::default();
    let (mut runtime, tx) = Runtime::new(config(false), NullTransport, sink(&events));

    let handles: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|id| {
            let tx = tx.clone();
            thread::spawn(move || tx.notify(notify::user_connected(id, id, false)).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(runtime.pump(), 3);
    assert_eq!(runtime.session().roster().len(), 3);
}

#[test]
fn commands_flow_through_transport() {
    let transport = RecordingTransport::new();
    let events = Events::default();
    let (mut runtime, tx) = Runtime::new(config(false), transport.clone(), sink(&events));

    tx.notify(notify::connected_to_server()).unwrap();
    tx.notify(notify::connected()).unwrap();
    runtime.pump();
    transport.take();

    runtime.begin_media_stream(true, true);
    runtime.join_channel(ChannelRequest::named("lobby"));
    tx.notify(notify::joined_channel()).unwrap();
    runtime.pump();
    runtime.send_message("hi");
    runtime.set_mute_audio(true);
    runtime.set_mute_video(false);
    runtime.set_audio_volume(&ParticipantId::from("p"), 0.25);
    runtime.begin_media_stream(true, true);
    runtime.leave_channel();

    assert_eq!(transport.take(), [
        TransportCommand::BeginMediaStream { video: true, audio: true },
        TransportCommand::JoinChannel {
            channel: "lobby".into(),
            is_private: false,
            password: String::new()
        },
        TransportCommand::SendMessage { text: "hi".into() },
        TransportCommand::SetMuteAudio { muted: true },
        TransportCommand::SetMuteVideo { muted: false },
        TransportCommand::SetAudioVolume { user_id: "p".into(), volume: 25 },
        TransportCommand::LeaveChannel,
    ]);
    assert!(events.lock().unwrap().contains(&SessionEvent::ChannelJoined));
}

#[test]
fn frames_released_through_runtime() {
    let events = Events::default();
    let (mut runtime, tx) = Runtime::new(config(false), NullTransport, sink(&events));
    let frames = ReleaseCounter::new();

    tx.notify(notify::user_connected("p", "P", false)).unwrap();
    tx.raw_frame(notify::frame_metadata("p", 2, 2), frames.rgba(2, 2, 1)).unwrap();
    tx.raw_frame(notify::frame_metadata("nobody", 2, 2), frames.rgba(2, 2, 1)).unwrap();
    runtime.pump();

    assert_eq!(frames.issued(), 2);
    assert!(frames.all_released());
    assert!(events.lock().unwrap().contains(&SessionEvent::FrameInitialized { user_id: "p".into() }));
}

/// Runtime inside a channel with `me` at the origin and `near`/`far` placed.
fn spatial_runtime(enabled: bool) -> (Runtime<RecordingTransport, impl FnMut(SessionEvent)>, RecordingTransport) {
    let transport = RecordingTransport::new();
    let events = Events::default();
    let (mut runtime, tx) = Runtime::new(config(enabled), transport.clone(), sink(&events));

    for json in [
        notify::connected_to_server(),
        notify::connected(),
    ] {
        tx.notify(json).unwrap();
    }
    runtime.pump();
    runtime.join_channel(ChannelRequest::default());
    for json in [
        notify::joined_channel(),
        notify::user_connected("me", "Me", true),
        notify::user_connected("near", "Near", false),
        notify::user_connected("far", "Far", false),
    ] {
        tx.notify(json).unwrap();
    }
    runtime.pump();

    runtime.attach_position(&"me".into(), Arc::new(Position::default())).unwrap();
    runtime.attach_position(&"near".into(), Arc::new(Position::new(0.0, 1.0, 0.0))).unwrap();
    runtime.attach_position(&"far".into(), Arc::new(Position::new(0.0, 100.0, 0.0))).unwrap();
    transport.take();

    (runtime, transport)
}

#[test]
fn spatial_update_covers_every_peer() {
    let (mut runtime, transport) = spatial_runtime(true);

    runtime.update_spatial_all();

    assert_eq!(transport.take(), [
        TransportCommand::SetAudioVolume { user_id: "near".into(), volume: 100 },
        TransportCommand::SetAudioVolume { user_id: "far".into(), volume: 0 },
    ]);
}

#[test]
fn spatial_update_disabled_by_config() {
    let (mut runtime, transport) = spatial_runtime(false);

    runtime.update_spatial_all();
    assert!(transport.take().is_empty());

    runtime.update_spatial(&"near".into());
    assert_eq!(transport.take().len(), 1);

    runtime.detach_position(&"near".into()).unwrap();
    runtime.update_spatial(&"near".into());
    assert!(transport.take().is_empty());
}

#[tokio::test]
async fn run_until_senders_dropped() {
    let transport = RecordingTransport::new();
    let events = Events::default();
    let (mut runtime, tx) = Runtime::new(config(false), transport.clone(), sink(&events));

    tx.notify(notify::connected_to_server()).unwrap();
    tx.notify(notify::connect_failed("denied")).unwrap();
    drop(tx);

    runtime.run().await;

    assert_eq!(runtime.session().state(), ConnectionStatus::ReadyToConnect);
    assert_eq!(events.lock().unwrap().as_slice(), [SessionEvent::ConnectFailed {
        reason: "denied".into()
    }]);
}

#[test]
fn closed_runtime_rejects_notifications() {
    let (runtime, tx) = Runtime::new(config(false), NullTransport, |_event: SessionEvent| {});
    drop(runtime);

    assert!(tx.is_closed());
    assert!(tx.notify(notify::connected()).is_err());
}
