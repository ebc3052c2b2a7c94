use confer_core::{ConnectionStatus, Session};
use confer_proto::ParticipantId;

/// Observable state of one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSnapshot {
    /// Participant id.
    pub id: ParticipantId,
    /// Marked as the local user in event snapshots.
    pub is_self: bool,
    /// `(width, height, byte length)` of the frame buffer, if allocated.
    pub frame: Option<(u32, u32, usize)>,
    /// Number of recorded chat messages.
    pub message_count: usize,
}

/// Observable state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle state.
    pub state: ConnectionStatus,
    /// Tracked self id.
    pub self_id: Option<ParticipantId>,
    /// Participants in join order.
    pub participants: Vec<ParticipantSnapshot>,
}

impl SessionSnapshot {
    /// Snapshot of a fresh session.
    pub fn empty() -> Self {
        Self { state: ConnectionStatus::Unknown, self_id: None, participants: Vec::new() }
    }

    /// Extract the observable state of `session`.
    pub fn from_session(session: &Session) -> Self {
        let roster = session.roster();
        let participants = roster
            .iter()
            .map(|p| ParticipantSnapshot {
                id: p.id().clone(),
                is_self: roster.is_self(p.id()),
                frame: p
                    .video()
                    .buffer()
                    .map(|b| (b.width(), b.height(), b.pixels().len())),
                message_count: p.messages().len(),
            })
            .collect();

        Self { state: session.state(), self_id: roster.self_id().cloned(), participants }
    }
}
