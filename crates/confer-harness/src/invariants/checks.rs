use std::collections::HashSet;

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// At most one participant is the local user.
pub struct SingleSelf;

impl Invariant for SingleSelf {
    fn name(&self) -> &'static str {
        "single_self"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let count = state.participants.iter().filter(|p| p.is_self).count();
        if count > 1 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{count} participants marked as self"),
            });
        }
        Ok(())
    }
}

/// A tracked self id refers to a participant in the roster.
pub struct SelfInRoster;

impl Invariant for SelfInRoster {
    fn name(&self) -> &'static str {
        "self_in_roster"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let Some(self_id) = &state.self_id else {
            return Ok(());
        };

        if !state.participants.iter().any(|p| &p.id == self_id) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("self id {self_id} not in roster"),
            });
        }
        Ok(())
    }
}

/// Participant ids are unique.
pub struct UniqueParticipants;

impl Invariant for UniqueParticipants {
    fn name(&self) -> &'static str {
        "unique_participants"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for p in &state.participants {
            if !seen.insert(&p.id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("participant {} appears twice", p.id),
                });
            }
        }
        Ok(())
    }
}

/// Allocated buffers hold exactly one RGBA32 frame of their dimensions.
pub struct FrameDimensions;

impl Invariant for FrameDimensions {
    fn name(&self) -> &'static str {
        "frame_dimensions"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        for p in &state.participants {
            let Some((width, height, len)) = p.frame else {
                continue;
            };

            let expected = width as usize * height as usize * 4;
            if width == 0 || height == 0 || len != expected {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "participant {} has a {width}x{height} buffer of {len} bytes",
                        p.id
                    ),
                });
            }
        }
        Ok(())
    }
}
