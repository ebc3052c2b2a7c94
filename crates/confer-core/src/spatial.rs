//! Distance-based spatial audio model.
//!
//! The gain a listener hears from a source falls off with distance: full
//! volume inside the minimal hearing radius, shaped by a falloff curve over
//! the next `radius` units, and the curve's value at zero beyond that.
//!
//! ```text
//! excess     = clamp(distance - minimal_hear_radius, 0, 99_999)
//! difference = radius - excess
//! gain       = curve(clamp(difference / radius, 0, 1))
//! ```
//!
//! [`volume`] is pure; the session applies it to the local participant and
//! one remote target and turns the result into a volume command.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the distance beyond the minimal hearing radius.
pub const MAX_EXCESS_DISTANCE: f32 = 99_999.0;

/// Point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Source of a participant's current position.
///
/// Attached to a roster entry by the application and read whenever the
/// spatial volume is recomputed. Implementations usually track a moving
/// object in the host application.
pub trait PositionProvider: Send + Sync {
    /// Current position.
    fn position(&self) -> Position;
}

impl PositionProvider for Position {
    fn position(&self) -> Position {
        *self
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Arc<P> {
    fn position(&self) -> Position {
        (**self).position()
    }
}

/// Maps a normalized proximity in `[0, 1]` to a gain.
pub trait FalloffCurve {
    /// Gain at proximity `t`.
    fn evaluate(&self, t: f32) -> f32;
}

/// Identity falloff: gain equals proximity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearCurve;

impl FalloffCurve for LinearCurve {
    fn evaluate(&self, t: f32) -> f32 {
        t
    }
}

/// Point on a [`KeyframeCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Input proximity.
    pub time: f32,
    /// Output gain.
    pub value: f32,
}

impl Keyframe {
    /// Construct a keyframe.
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Malformed keyframe list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// No keyframes.
    #[error("curve has no keyframes")]
    Empty,

    /// A keyframe time or value is NaN or infinite.
    #[error("keyframe {index} is not finite")]
    NonFinite {
        /// Offending keyframe index
        index: usize,
    },

    /// Keyframe times are not strictly increasing.
    #[error("keyframe {index} does not follow the previous one in time")]
    Unsorted {
        /// Offending keyframe index
        index: usize,
    },
}

/// Piecewise-linear falloff curve.
///
/// Evaluation clamps to the first and last keyframe values outside the
/// curve's time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Build a curve from keyframes sorted by strictly increasing time.
    ///
    /// # Errors
    ///
    /// - [`CurveError::Empty`] if `keys` is empty
    /// - [`CurveError::NonFinite`] if any time or value is NaN or infinite
    /// - [`CurveError::Unsorted`] if times are not strictly increasing
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        if keys.is_empty() {
            return Err(CurveError::Empty);
        }

        for (index, key) in keys.iter().enumerate() {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
        }

        if let Some(index) = keys.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(CurveError::Unsorted { index: index + 1 });
        }

        Ok(Self { keys })
    }

    /// Straight line from `(0, 0)` to `(1, 1)`.
    pub fn linear() -> Self {
        Self { keys: vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)] }
    }

    /// Keyframes in time order.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

impl Default for KeyframeCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl TryFrom<Vec<Keyframe>> for KeyframeCurve {
    type Error = CurveError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<KeyframeCurve> for Vec<Keyframe> {
    fn from(curve: KeyframeCurve) -> Self {
        curve.keys
    }
}

impl FalloffCurve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };

        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = (t - a.time) / (b.time - a.time);
                return a.value + (b.value - a.value) * span;
            }
        }

        last.value
    }
}

/// Spatial audio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialAudioConfig {
    /// Enables periodic spatial updates in the runtime.
    pub enabled: bool,
    /// Falloff distance beyond the minimal hearing radius. Must be positive.
    pub radius: f32,
    /// Distance within which the gain is the curve's value at 1.
    pub minimal_hear_radius: f32,
    /// Proximity-to-gain mapping.
    pub curve: KeyframeCurve,
}

impl Default for SpatialAudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 10.0,
            minimal_hear_radius: 1.0,
            curve: KeyframeCurve::linear(),
        }
    }
}

/// Gain heard at `target` from `source`.
///
/// Pure. With a curve whose values lie in `[0, 1]` the result does too, and
/// it is non-increasing in distance for any non-decreasing curve.
pub fn volume<C: FalloffCurve + ?Sized>(
    source: Position,
    target: Position,
    radius: f32,
    minimal_hear_radius: f32,
    curve: &C,
) -> f32 {
    let excess = (source.distance(target) - minimal_hear_radius).clamp(0.0, MAX_EXCESS_DISTANCE);
    let difference = radius - excess;
    let proximity = difference / radius;
    let proximity = if proximity.is_nan() { 0.0 } else { proximity.clamp(0.0, 1.0) };

    curve.evaluate(proximity)
}
