//! Fuzz target for the Session state machine
//!
//! Ensure roster consistency and frame release under arbitrary input order
//!
//! # Strategy
//!
//! - Lifecycle notifications in any order, including out-of-order ones
//! - Users joining and leaving repeatedly, with and without the self role
//! - Frames with zero, mismatched, and short dimensions
//! - Commands issued in every state
//!
//! # Invariants
//!
//! - At most one self participant, and it is in the roster
//! - Allocated frame buffers hold exactly `width * height * 4` bytes
//! - Every raw frame is released exactly once
//! - Commands are only produced in their allowed states

#![no_main]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use arbitrary::Arbitrary;
use confer_core::{ChannelRequest, ConnectionStatus, Session, SessionConfig};
use confer_proto::{FrameKind, FrameMetadata, Notification, ParticipantId, RawFrame, UserInfo};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum SessionOp {
    Lifecycle(LifecycleKind),
    UserConnected { user: u8, is_self: bool },
    UserDisconnected { user: u8 },
    Frame { user: u8, width: u8, height: u8, short: bool },
    Connect,
    Join,
    Leave,
    Send,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum LifecycleKind {
    ServerReached,
    Connected,
    ConnectFailed,
    Joined,
    JoinFailed,
    Left,
}

fn user_id(user: u8) -> ParticipantId {
    ParticipantId::new(format!("u{}", user % 4))
}

fuzz_target!(|ops: Vec<SessionOp>| {
    let mut session = Session::new(SessionConfig::default());
    session.initialize();

    let released = Arc::new(AtomicUsize::new(0));
    let mut issued = 0usize;

    for op in ops {
        let before = session.state();
        let actions = match op {
            SessionOp::Lifecycle(kind) => {
                let notification = match kind {
                    LifecycleKind::ServerReached => Notification::ConnectedToServer,
                    LifecycleKind::Connected => Notification::Connected,
                    LifecycleKind::ConnectFailed => Notification::ConnectFailed { reason: String::new() },
                    LifecycleKind::Joined => Notification::JoinedChannel,
                    LifecycleKind::JoinFailed => Notification::JoinChannelFailed { reason: String::new() },
                    LifecycleKind::Left => Notification::LeftChannel,
                };
                session.handle_notification(notification)
            },
            SessionOp::UserConnected { user, is_self } => {
                session.handle_notification(Notification::UserConnected {
                    id: user_id(user),
                    is_self,
                    info: UserInfo::default(),
                })
            },
            SessionOp::UserDisconnected { user } => {
                session.handle_notification(Notification::UserDisconnected { id: user_id(user) })
            },
            SessionOp::Frame { user, width, height, short } => {
                let (width, height) = (u32::from(width % 16), u32::from(height % 16));
                let len = if short { 1 } else { width as usize * height as usize * 4 };
                let counter = Arc::clone(&released);
                issued += 1;
                let frame = RawFrame::with_release(vec![0u8; len], move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
                let metadata = FrameMetadata {
                    kind: FrameKind::VideoFrameReceived,
                    user_id: user_id(user),
                    width,
                    height,
                    length: len as u64,
                };
                session.handle_frame(&metadata, frame)
            },
            SessionOp::Connect => session.connect(),
            SessionOp::Join => session.join_channel(ChannelRequest::default()),
            SessionOp::Leave => session.leave_channel(),
            SessionOp::Send => session.send_message("fuzz"),
        };

        let sent = actions.iter().any(|a| a.as_command().is_some());
        match op {
            SessionOp::Connect => assert!(!sent || before == ConnectionStatus::ReadyToConnect),
            SessionOp::Join => assert!(!sent || before == ConnectionStatus::Connected),
            SessionOp::Leave | SessionOp::Send => {
                assert!(!sent || before == ConnectionStatus::JoinedChannel);
            },
            _ => {},
        }

        let roster = session.roster();
        let selves = roster.iter().filter(|p| roster.is_self(p.id())).count();
        assert!(selves <= 1, "{selves} self participants");
        if let Some(id) = roster.self_id() {
            assert!(roster.contains(id), "self {id} missing from roster");
        }
        for p in roster.iter() {
            if let Some(buffer) = p.video().buffer() {
                let expected = buffer.width() as usize * buffer.height() as usize * 4;
                assert_eq!(buffer.pixels().len(), expected);
            }
        }
        assert_eq!(released.load(Ordering::SeqCst), issued, "frame not released");
    }
});
