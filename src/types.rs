//! Shared types used across the DDS VFO firmware
//!
//! Domain types for tuning steps, plus the step-size arithmetic the button
//! handler and the controller share.

use crate::config::{MAX_STEP_HZ, MIN_STEP_HZ, STEP_DIVISOR};

/// Tuning step size
///
/// The seven decade values the button cycles through. The shared state keeps
/// the step as a raw integer; this enum is the typed view used for the step
/// indicator and for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TuningStep {
    /// 1 Hz step
    Hz1,
    /// 10 Hz step
    Hz10,
    /// 100 Hz step
    Hz100,
    /// 1 kHz step
    KHz1,
    /// 10 kHz step
    KHz10,
    /// 100 kHz step
    KHz100,
    /// 1 MHz step
    MHz1,
}

impl TuningStep {
    /// All steps, smallest first
    pub const ALL: [Self; 7] = [
        Self::Hz1,
        Self::Hz10,
        Self::Hz100,
        Self::KHz1,
        Self::KHz10,
        Self::KHz100,
        Self::MHz1,
    ];

    /// Get the step size in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::Hz1 => 1,
            Self::Hz10 => 10,
            Self::Hz100 => 100,
            Self::KHz1 => 1_000,
            Self::KHz10 => 10_000,
            Self::KHz100 => 100_000,
            Self::MHz1 => 1_000_000,
        }
    }

    /// Typed view of a raw step, `None` unless it is one of the decades
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            1 => Some(Self::Hz1),
            10 => Some(Self::Hz10),
            100 => Some(Self::Hz100),
            1_000 => Some(Self::KHz1),
            10_000 => Some(Self::KHz10),
            100_000 => Some(Self::KHz100),
            1_000_000 => Some(Self::MHz1),
            _ => None,
        }
    }

    /// Indicator level, 0 for 1 Hz up to 6 for 1 MHz
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Hz1 => 0,
            Self::Hz10 => 1,
            Self::Hz100 => 2,
            Self::KHz1 => 3,
            Self::KHz10 => 4,
            Self::KHz100 => 5,
            Self::MHz1 => 6,
        }
    }

    /// Cycle to next smaller step
    #[must_use]
    pub const fn next_smaller(self) -> Self {
        match self {
            Self::Hz1 => Self::MHz1, // Wrap around
            Self::Hz10 => Self::Hz1,
            Self::Hz100 => Self::Hz10,
            Self::KHz1 => Self::Hz100,
            Self::KHz10 => Self::KHz1,
            Self::KHz100 => Self::KHz10,
            Self::MHz1 => Self::KHz100,
        }
    }

    /// Short label for the display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hz1 => "1Hz",
            Self::Hz10 => "10Hz",
            Self::Hz100 => "100Hz",
            Self::KHz1 => "1kHz",
            Self::KHz10 => "10kHz",
            Self::KHz100 => "100k",
            Self::MHz1 => "1MHz",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuningStep {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Hz1 => defmt::write!(f, "1 Hz"),
            Self::Hz10 => defmt::write!(f, "10 Hz"),
            Self::Hz100 => defmt::write!(f, "100 Hz"),
            Self::KHz1 => defmt::write!(f, "1 kHz"),
            Self::KHz10 => defmt::write!(f, "10 kHz"),
            Self::KHz100 => defmt::write!(f, "100 kHz"),
            Self::MHz1 => defmt::write!(f, "1 MHz"),
        }
    }
}

/// Step after one button press
///
/// Divides by [`STEP_DIVISOR`]; a result below [`MIN_STEP_HZ`] wraps to
/// [`MAX_STEP_HZ`] instead of sticking at the minimum.
#[must_use]
pub const fn next_step(step_hz: u32) -> u32 {
    wrap_step(step_hz / STEP_DIVISOR)
}

/// Replace an underflowed step with [`MAX_STEP_HZ`]
#[must_use]
pub const fn wrap_step(step_hz: u32) -> u32 {
    if step_hz < MIN_STEP_HZ {
        MAX_STEP_HZ
    } else {
        step_hz
    }
}
