//! Script execution.

use std::{fmt, sync::Arc};

use confer_client::{InboundSender, Runtime};
use confer_core::{
    ChannelRequest, ConnectionStatus, DEFAULT_CHANNEL, Position, SessionConfig, SessionEvent,
};
use confer_proto::{ParticipantId, RawFrame, UserInfo, decode_frame_metadata};

use crate::{error::ReplayError, script::Op, transport::LoggingTransport};

/// Participant state at the end of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSummary {
    /// Participant id.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Local user.
    pub is_self: bool,
    /// Recorded chat messages.
    pub messages: usize,
    /// Frame buffer dimensions, if allocated.
    pub frame: Option<(u32, u32)>,
}

/// Session state at the end of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Final lifecycle state.
    pub state: ConnectionStatus,
    /// Roster in join order.
    pub participants: Vec<ParticipantSummary>,
    /// Transport commands issued.
    pub commands: usize,
    /// Session events emitted.
    pub events: usize,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "state: {}", self.state)?;
        writeln!(f, "commands: {}", self.commands)?;
        writeln!(f, "events: {}", self.events)?;
        for p in &self.participants {
            let role = if p.is_self { " (self)" } else { "" };
            let frame = p.frame.map_or_else(|| "none".to_string(), |(w, h)| format!("{w}x{h}"));
            writeln!(f, "- {}{role} {:?}: {} messages, frame {frame}", p.id, p.name, p.messages)?;
        }
        Ok(())
    }
}

/// Run `ops` against a fresh session.
///
/// Inbound ops are queued; every command op first drains the queue. After
/// the last op the sender is dropped and the runtime drains what is left.
pub async fn replay(config: SessionConfig, ops: Vec<Op>) -> Result<ReplaySummary, ReplayError> {
    let mut events = 0usize;
    let sink = |event: SessionEvent| {
        events += 1;
        tracing::info!(?event, "session event");
    };

    let (mut runtime, tx) = Runtime::new(config, LoggingTransport::new(), sink);

    for op in ops {
        step(&mut runtime, &tx, op)?;
    }

    drop(tx);
    runtime.run().await;

    let session = runtime.session();
    let roster = session.roster();
    let participants = roster
        .iter()
        .map(|p| ParticipantSummary {
            id: p.id().clone(),
            name: p.info().name.clone(),
            is_self: roster.is_self(p.id()),
            messages: p.messages().len(),
            frame: p.video().buffer().map(|b| (b.width(), b.height())),
        })
        .collect();

    let summary = ReplaySummary {
        state: session.state(),
        participants,
        commands: runtime.transport().command_count(),
        events: 0,
    };
    drop(runtime);

    Ok(ReplaySummary { events, ..summary })
}

fn step<S>(
    runtime: &mut Runtime<LoggingTransport, S>,
    tx: &InboundSender,
    op: Op,
) -> Result<(), ReplayError>
where
    S: FnMut(SessionEvent),
{
    match op {
        Op::Notify { payload } => tx.notify(payload.to_string())?,
        Op::Frame { metadata, fill } => {
            let metadata = metadata.to_string();
            let len = decode_frame_metadata(&metadata)
                .ok()
                .and_then(|m| m.expected_len())
                .unwrap_or(0);
            tx.raw_frame(metadata, RawFrame::new(vec![fill; len]))?;
        },
        command => {
            runtime.pump();
            run_command(runtime, command);
        },
    }
    Ok(())
}

fn run_command<S>(runtime: &mut Runtime<LoggingTransport, S>, op: Op)
where
    S: FnMut(SessionEvent),
{
    match op {
        Op::Notify { .. } | Op::Frame { .. } => {},
        Op::SetUser { user } => match serde_json::from_value::<UserInfo>(user) {
            Ok(info) => runtime.set_user(&info),
            Err(error) => tracing::warn!(%error, "invalid user info"),
        },
        Op::Connect => runtime.connect(),
        Op::Join { channel, is_private, password } => runtime.join_channel(ChannelRequest {
            channel: channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            is_private,
            password,
        }),
        Op::Leave => runtime.leave_channel(),
        Op::Send { text } => runtime.send_message(text),
        Op::MuteAudio { muted } => runtime.set_mute_audio(muted),
        Op::MuteVideo { muted } => runtime.set_mute_video(muted),
        Op::Volume { user, volume } => runtime.set_audio_volume(&ParticipantId::new(user), volume),
        Op::BeginStream { video, audio } => runtime.begin_media_stream(video, audio),
        Op::Position { user, x, y, z } => {
            let id = ParticipantId::new(user);
            if let Err(error) = runtime.attach_position(&id, Arc::new(Position::new(x, y, z))) {
                tracing::warn!(%error, "position not attached");
            }
        },
        Op::Spatial { user: Some(user) } => runtime.update_spatial(&ParticipantId::new(user)),
        Op::Spatial { user: None } => runtime.update_spatial_all(),
    }
}
