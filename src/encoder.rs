//! Quadrature Decoding
//!
//! Pure decoding logic for the tuning encoder. The interrupt-side state
//! lives in [`crate::state::TunerState`]; this module only answers "did this
//! edge complete a step, and in which direction".
//!
//! Two strategies are available:
//!
//! - [`DecoderKind::EdgeLatch`] (default): each channel remembers its last
//!   level. A rising edge on one channel while the other is low is a step;
//!   A first means clockwise, B first means counter-clockwise. Cheap and
//!   exact on clean signals. Contact bounce on a rising edge counts again,
//!   so noisy encoders need RC filtering on both lines.
//! - [`DecoderKind::GrayCode`]: follows the full 00 → 10 → 11 → 01 → 00
//!   cycle and emits one step per completed detent. Bounce walks the state
//!   back and forth without producing extra steps.
//!
//! The Gray-code table is written for an encoder that rests at 00. A
//! common-to-ground encoder on pull-ups rests at 11 instead; set
//! `TunerConfig::detent_high` and both levels are inverted before they reach
//! [`GrayState::advance`], which keeps directions unchanged.

/// Encoder rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise rotation (increment)
    Clockwise,
    /// Counter-clockwise rotation (decrement)
    CounterClockwise,
}

impl Direction {
    /// Apply one step of `step_hz` to an accumulator value
    ///
    /// Saturates at the `i32` limits; range clamping is the controller's job.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn apply(self, value: i32, step_hz: u32) -> i32 {
        // Steps never exceed MAX_STEP_HZ, far below i32::MAX
        let step = step_hz as i32;
        match self {
            Self::Clockwise => value.saturating_add(step),
            Self::CounterClockwise => value.saturating_sub(step),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clockwise => defmt::write!(f, "CW"),
            Self::CounterClockwise => defmt::write!(f, "CCW"),
        }
    }
}

/// Encoder channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Channel A (leads on clockwise rotation)
    A,
    /// Channel B (leads on counter-clockwise rotation)
    B,
}

impl Channel {
    /// Direction a step takes when this channel rises first
    #[must_use]
    pub const fn leading_direction(self) -> Direction {
        match self {
            Self::A => Direction::Clockwise,
            Self::B => Direction::CounterClockwise,
        }
    }
}

/// Decoding strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DecoderKind {
    /// Rising edge checks the other channel's last level
    #[default]
    EdgeLatch,
    /// Full Gray-code transition table, stepping when the detent level is
    /// reached again
    GrayCode,
}

#[cfg(feature = "embedded")]
impl defmt::Format for DecoderKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::EdgeLatch => defmt::write!(f, "edge-latch"),
            Self::GrayCode => defmt::write!(f, "gray-code"),
        }
    }
}

/// Edge-latch decision for one edge
///
/// `high` is the new level of `channel`, `other_high` the last level latched
/// for the other channel. Falling edges never step.
#[must_use]
pub const fn resolve_edge(channel: Channel, high: bool, other_high: bool) -> Option<Direction> {
    if high && !other_high {
        Some(channel.leading_direction())
    } else {
        None
    }
}

/// Gray-code decoder states
///
/// Named after the (A, B) level pair they sit on:
///
/// ```text
/// clockwise:         Idle 00 → CwStart 10 → CwNext 11 → CwFinal 01 → Idle
/// counter-clockwise: Idle 00 → CcwStart 01 → CcwNext 11 → CcwFinal 10 → Idle
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum GrayState {
    /// Both low, at a detent
    #[default]
    Idle = 0,
    /// A rose first
    CwStart = 1,
    /// Both high, moving clockwise
    CwNext = 2,
    /// A fell, B still high
    CwFinal = 3,
    /// B rose first
    CcwStart = 4,
    /// Both high, moving counter-clockwise
    CcwNext = 5,
    /// B fell, A still high
    CcwFinal = 6,
}

impl GrayState {
    /// Raw value for atomic storage
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw value; unknown values fall back to [`GrayState::Idle`]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::CwStart,
            2 => Self::CwNext,
            3 => Self::CwFinal,
            4 => Self::CcwStart,
            5 => Self::CcwNext,
            6 => Self::CcwFinal,
            _ => Self::Idle,
        }
    }

    /// The (A, B) levels this state sits on
    #[must_use]
    pub const fn levels(self) -> (bool, bool) {
        match self {
            Self::Idle => (false, false),
            Self::CwStart | Self::CcwFinal => (true, false),
            Self::CwNext | Self::CcwNext => (true, true),
            Self::CwFinal | Self::CcwStart => (false, true),
        }
    }

    /// Feed the current (A, B) levels, returns a direction on a full cycle
    #[must_use]
    pub const fn advance(self, a: bool, b: bool) -> (Self, Option<Direction>) {
        use GrayState::{CcwFinal, CcwNext, CcwStart, CwFinal, CwNext, CwStart, Idle};

        let (la, lb) = self.levels();
        if la == a && lb == b {
            return (self, None);
        }

        match (self, a, b) {
            (Idle, true, false) => (CwStart, None),
            (Idle, false, true) => (CcwStart, None),

            // Clockwise sequence: 00 -> 10 -> 11 -> 01 -> 00
            (CwStart, true, true) => (CwNext, None),
            (CwNext, false, true) => (CwFinal, None),
            (CwFinal, false, false) => (Idle, Some(Direction::Clockwise)),

            // Counter-clockwise sequence: 00 -> 01 -> 11 -> 10 -> 00
            (CcwStart, true, true) => (CcwNext, None),
            (CcwNext, true, false) => (CcwFinal, None),
            (CcwFinal, false, false) => (Idle, Some(Direction::CounterClockwise)),

            // Bounce back one position
            (CwNext, true, false) => (CwStart, None),
            (CwFinal, true, true) => (CwNext, None),
            (CcwNext, false, true) => (CcwStart, None),
            (CcwFinal, true, true) => (CcwNext, None),

            // Invalid transition - resynchronise at the detent
            _ => (Idle, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_edges_never_step() {
        assert_eq!(resolve_edge(Channel::A, false, false), None);
        assert_eq!(resolve_edge(Channel::A, false, true), None);
        assert_eq!(resolve_edge(Channel::B, false, false), None);
    }

    #[test]
    fn rising_edge_needs_other_channel_low() {
        assert_eq!(resolve_edge(Channel::A, true, false), Some(Direction::Clockwise));
        assert_eq!(resolve_edge(Channel::A, true, true), None);
        assert_eq!(resolve_edge(Channel::B, true, false), Some(Direction::CounterClockwise));
        assert_eq!(resolve_edge(Channel::B, true, true), None);
    }

    #[test]
    fn gray_state_bits_roundtrip() {
        for bits in 0..7 {
            assert_eq!(GrayState::from_bits(bits).bits(), bits);
        }
        assert_eq!(GrayState::from_bits(42), GrayState::Idle);
    }

    #[test]
    fn gray_repeated_levels_hold_state() {
        let (s, d) = GrayState::CwNext.advance(true, true);
        assert_eq!(s, GrayState::CwNext);
        assert_eq!(d, None);
    }

    #[test]
    fn direction_apply_saturates() {
        assert_eq!(Direction::Clockwise.apply(i32::MAX - 1, 10), i32::MAX);
        assert_eq!(Direction::CounterClockwise.apply(i32::MIN + 1, 10), i32::MIN);
        assert_eq!(Direction::CounterClockwise.apply(1000, 1000), 0);
    }
}
