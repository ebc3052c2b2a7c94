//! Participant roster and chat history.
//!
//! Participants are kept in join order. Exactly one entry may carry the self
//! role (the local user); its id is tracked separately so lookups by role
//! never scan. Each participant owns its frame slot, its received chat
//! messages, and an optional position source for spatial audio.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use confer_proto::{IncomingMessage, ParticipantId, UserInfo};

use crate::{
    error::SessionError,
    event::SessionEvent,
    spatial::{Position, PositionProvider},
    video::VideoFrame,
};

/// Chat message resolved against the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Author's participant id.
    pub author_id: ParticipantId,
    /// Author's display info when the message was recorded.
    pub author: UserInfo,
    /// Message text.
    pub text: String,
    /// Server-side creation time.
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a participant for events.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantInfo {
    /// Participant id.
    pub id: ParticipantId,
    /// Display info.
    pub info: UserInfo,
    /// Whether this is the local user.
    pub is_self: bool,
}

/// Roster entry.
pub struct Participant {
    id: ParticipantId,
    info: UserInfo,
    video: VideoFrame,
    messages: Vec<ChatMessage>,
    position: Option<Arc<dyn PositionProvider>>,
}

impl Participant {
    fn new(id: ParticipantId, info: UserInfo) -> Self {
        Self { id, info, video: VideoFrame::default(), messages: Vec::new(), position: None }
    }

    /// Participant id.
    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// Display info.
    pub fn info(&self) -> &UserInfo {
        &self.info
    }

    /// Frame slot.
    pub fn video(&self) -> &VideoFrame {
        &self.video
    }

    pub(crate) fn video_mut(&mut self) -> &mut VideoFrame {
        &mut self.video
    }

    /// Messages authored by this participant, in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current position, if a provider is attached.
    pub fn position(&self) -> Option<Position> {
        self.position.as_ref().map(|provider| provider.position())
    }

    pub(crate) fn set_position(&mut self, provider: Option<Arc<dyn PositionProvider>>) {
        self.position = provider;
    }

    /// Release per-participant resources ahead of removal.
    fn dispose(&mut self) {
        self.video.dispose();
        self.messages.clear();
        self.position = None;
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("id", &self.id)
            .field("info", &self.info)
            .field("video", &self.video.is_initialized())
            .field("messages", &self.messages.len())
            .field("position", &self.position())
            .finish()
    }
}

/// Connected participants in join order.
#[derive(Debug, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    self_id: Option<ParticipantId>,
}

impl Roster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Look up a participant.
    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.id == id)
    }

    /// Whether `id` is in the roster.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    /// Id of the local participant, once known.
    pub fn self_id(&self) -> Option<&ParticipantId> {
        self.self_id.as_ref()
    }

    /// The local participant, once known.
    pub fn self_participant(&self) -> Option<&Participant> {
        self.self_id.as_ref().and_then(|id| self.get(id))
    }

    /// Whether `id` is the local participant.
    pub fn is_self(&self, id: &ParticipantId) -> bool {
        self.self_id.as_ref() == Some(id)
    }

    /// Event snapshot of one participant.
    pub fn info_of(&self, participant: &Participant) -> ParticipantInfo {
        ParticipantInfo {
            id: participant.id.clone(),
            info: participant.info.clone(),
            is_self: self.is_self(&participant.id),
        }
    }

    /// Event snapshot of the whole roster.
    pub fn snapshot(&self) -> Vec<ParticipantInfo> {
        self.participants.iter().map(|p| self.info_of(p)).collect()
    }

    /// Add a participant, optionally as the local user.
    ///
    /// A second self participant replaces the previous self designation.
    ///
    /// # Errors
    ///
    /// [`SessionError::DuplicateParticipant`] if `id` is already present.
    pub(crate) fn add(
        &mut self,
        id: ParticipantId,
        info: UserInfo,
        is_self: bool,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        if self.contains(&id) {
            return Err(SessionError::DuplicateParticipant { id });
        }

        if is_self {
            self.self_id = Some(id.clone());
        }
        self.participants.push(Participant::new(id, info));

        let joined = self.participants.last().map(|p| self.info_of(p));
        Ok(joined
            .into_iter()
            .map(SessionEvent::UserConnected)
            .chain([SessionEvent::RosterUpdated(self.snapshot())])
            .collect())
    }

    /// Dispose and remove a participant.
    ///
    /// Emits, in order: `FrameUpdated` for the released buffer,
    /// `UserDisconnected`, `RosterUpdated`. Clears the self designation when
    /// the local participant leaves.
    ///
    /// # Errors
    ///
    /// [`SessionError::ParticipantNotFound`] if `id` is absent.
    pub(crate) fn remove(&mut self, id: &ParticipantId) -> Result<Vec<SessionEvent>, SessionError> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| SessionError::ParticipantNotFound { id: id.clone() })?;

        let info = self.info_of(&self.participants[index]);
        let mut participant = self.participants.remove(index);
        participant.dispose();

        if info.is_self {
            self.self_id = None;
        }

        Ok(vec![
            SessionEvent::FrameUpdated { user_id: info.id.clone() },
            SessionEvent::UserDisconnected(info),
            SessionEvent::RosterUpdated(self.snapshot()),
        ])
    }

    /// Record a message against its author.
    ///
    /// # Errors
    ///
    /// [`SessionError::ParticipantNotFound`] if the author is not present.
    pub(crate) fn post(&mut self, message: IncomingMessage) -> Result<SessionEvent, SessionError> {
        let author = self
            .get_mut(&message.author_id)
            .ok_or_else(|| SessionError::ParticipantNotFound { id: message.author_id.clone() })?;

        let chat = ChatMessage {
            author: author.info.clone(),
            author_id: message.author_id,
            text: message.text,
            created_at: message.created_at,
        };
        author.messages.push(chat.clone());

        Ok(SessionEvent::MessageReceived(chat))
    }
}
