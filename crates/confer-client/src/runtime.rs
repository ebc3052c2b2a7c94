//! Runtime that drives a [`Session`] from a transport.
//!
//! The runtime owns the session, the transport, the event sink, and the
//! receiving end of the inbound channel. It coordinates:
//! - inbound messages from transport callbacks, applied in delivery order
//! - application commands, forwarded to the session
//! - session actions, executed strictly in the order returned

use std::sync::Arc;

use confer_core::{
    ChannelRequest, PositionProvider, Session, SessionAction, SessionConfig, SessionError,
};
use confer_proto::{ParticipantId, UserInfo};

use crate::{
    inbound::{Inbound, InboundReceiver, InboundSender, inbound_channel},
    sink::EventSink,
    transport::Transport,
};

/// Session runtime bound to a transport and an event sink.
pub struct Runtime<T, S>
where
    T: Transport,
    S: EventSink,
{
    session: Session,
    transport: T,
    sink: S,
    inbound: InboundReceiver,
}

impl<T, S> Runtime<T, S>
where
    T: Transport,
    S: EventSink,
{
    /// Create a runtime and initialize the transport.
    ///
    /// Returns the sender transport callbacks push into. The runtime's
    /// [`Runtime::run`] loop ends once every clone of it is dropped.
    pub fn new(config: SessionConfig, transport: T, sink: S) -> (Self, InboundSender) {
        let (tx, rx) = inbound_channel();
        let mut runtime = Self { session: Session::new(config), transport, sink, inbound: rx };

        let actions = runtime.session.initialize();
        runtime.execute(actions);

        (runtime, tx)
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Apply every queued inbound message without waiting.
    ///
    /// Returns the number of messages applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(message) = self.inbound.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Apply inbound messages until every sender is dropped.
    pub async fn run(&mut self) {
        while let Some(message) = self.inbound.recv().await {
            self.apply(message);
        }
        tracing::debug!("inbound channel closed");
    }

    /// Apply one inbound message.
    pub fn apply(&mut self, message: Inbound) {
        let actions = match message {
            Inbound::Notification(json) => self.session.handle_raw_notification(&json),
            Inbound::Frame { metadata, frame } => self.session.handle_frame(&metadata, frame),
            Inbound::RawFrame { metadata, frame } => {
                self.session.handle_raw_frame(&metadata, frame)
            },
        };
        self.execute(actions);
    }

    /// Publish local user metadata.
    pub fn set_user(&mut self, info: &UserInfo) {
        let actions = self.session.set_user(info);
        self.execute(actions);
    }

    /// Connect with the configured app key.
    pub fn connect(&mut self) {
        let actions = self.session.connect();
        self.execute(actions);
    }

    /// Join a channel.
    pub fn join_channel(&mut self, request: ChannelRequest) {
        let actions = self.session.join_channel(request);
        self.execute(actions);
    }

    /// Leave the current channel.
    pub fn leave_channel(&mut self) {
        let actions = self.session.leave_channel();
        self.execute(actions);
    }

    /// Send a chat message.
    pub fn send_message(&mut self, text: impl Into<String>) {
        let actions = self.session.send_message(text);
        self.execute(actions);
    }

    /// Mute or unmute local audio.
    pub fn set_mute_audio(&mut self, muted: bool) {
        let actions = self.session.set_mute_audio(muted);
        self.execute(actions);
    }

    /// Mute or unmute local video.
    pub fn set_mute_video(&mut self, muted: bool) {
        let actions = self.session.set_mute_video(muted);
        self.execute(actions);
    }

    /// Set a remote participant's volume in `[0, 1]`.
    pub fn set_audio_volume(&mut self, user_id: &ParticipantId, volume: f32) {
        let actions = self.session.set_audio_volume(user_id, volume);
        self.execute(actions);
    }

    /// Start publishing local media.
    pub fn begin_media_stream(&mut self, video: bool, audio: bool) {
        let actions = self.session.begin_media_stream(video, audio);
        self.execute(actions);
    }

    /// Attach a position source to a participant.
    pub fn attach_position(
        &mut self,
        id: &ParticipantId,
        provider: Arc<dyn PositionProvider>,
    ) -> Result<(), SessionError> {
        self.session.attach_position(id, provider)
    }

    /// Detach a participant's position source.
    pub fn detach_position(&mut self, id: &ParticipantId) -> Result<(), SessionError> {
        self.session.detach_position(id)
    }

    /// Recompute one participant's spatial volume.
    pub fn update_spatial(&mut self, target: &ParticipantId) {
        let actions = self.session.update_spatial(target);
        self.execute(actions);
    }

    /// Recompute the spatial volume of every remote participant.
    ///
    /// Intended to run once per host tick. No-op unless spatial audio is
    /// enabled in the configuration.
    pub fn update_spatial_all(&mut self) {
        if !self.session.config().spatial.enabled {
            return;
        }

        let targets: Vec<ParticipantId> = self
            .session
            .roster()
            .iter()
            .map(|p| p.id().clone())
            .filter(|id| !self.session.roster().is_self(id))
            .collect();

        for target in targets {
            self.update_spatial(&target);
        }
    }

    fn execute(&mut self, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::Send(command) => {
                    tracing::trace!(command = command.name(), "transport command");
                    self.transport.dispatch(&command);
                },
                SessionAction::Emit(event) => self.sink.on_event(event),
            }
        }
    }
}
