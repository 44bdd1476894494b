//! Display Collaborator
//!
//! The controller talks to whatever display is fitted through
//! [`DisplayDriver`]. Boards without one use [`NullDisplay`]. The readout
//! formatting below is shared by every implementation and is pure.
//!
//! # Frequency readout
//!
//! Four significant digits with a movable decimal point:
//!
//! | Range (Hz)                | Shown as  | Resolution |
//! |---------------------------|-----------|------------|
//! | 0 ..= 9 999               | `9999 Hz` | 1 Hz       |
//! | 10 000 ..= 99 999         | `99.99 kHz` | 10 Hz    |
//! | 100 000 ..= 999 999       | `999.9 kHz` | 100 Hz   |
//! | 1 000 000 ..= 9 999 999   | `9.999 MHz` | 1 kHz    |
//! | 10 000 000 and up         | `32.00 MHz` | 10 kHz   |
//!
//! Lower digits are truncated, not rounded.

use crate::types::TuningStep;
use core::fmt;

/// Number of step indicator levels
pub const STEP_LEVELS: u8 = 7;

/// Display capability
///
/// Calls come from the controller loop and must not block; implementations
/// that drive a slow bus should hand the work to another task.
pub trait DisplayDriver {
    /// Show a (clamped) frequency
    fn show_frequency(&mut self, hz: u32);

    /// Show the tuning step indicator
    fn show_step(&mut self, step_hz: u32);

    /// Best-effort diagnostic text, no acknowledgment
    fn log_line(&mut self, text: &str) {
        info!("{}", text);
    }
}

/// Display for headless boards
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl DisplayDriver for NullDisplay {
    fn show_frequency(&mut self, _hz: u32) {}

    fn show_step(&mut self, _step_hz: u32) {}
}

/// Readout unit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// Hertz
    Hz,
    /// Kilohertz
    KHz,
    /// Megahertz
    MHz,
}

impl Unit {
    /// Unit suffix
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hz => "Hz",
            Self::KHz => "kHz",
            Self::MHz => "MHz",
        }
    }
}

/// Display-ready frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readout {
    /// Up to four digits
    pub digits: u16,
    /// Digits right of the decimal point
    pub decimals: u8,
    /// Unit shown after the digits
    pub unit: Unit,
}

impl Readout {
    /// Scale a frequency to the readout table above
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn for_frequency(hz: u32) -> Self {
        let (digits, decimals, unit) = match hz {
            0..=9_999 => (hz, 0, Unit::Hz),
            10_000..=99_999 => (hz / 10, 2, Unit::KHz),
            100_000..=999_999 => (hz / 100, 1, Unit::KHz),
            1_000_000..=9_999_999 => (hz / 1_000, 3, Unit::MHz),
            // Clamped frequencies stay below 100 MHz, so four digits suffice
            _ => (hz / 10_000, 2, Unit::MHz),
        };
        Self {
            digits: digits as u16,
            decimals,
            unit,
        }
    }

    /// Integer part of the shown value
    #[must_use]
    pub const fn whole(&self) -> u16 {
        self.digits / pow10(self.decimals)
    }

    /// Fractional digits of the shown value
    #[must_use]
    pub const fn fraction(&self) -> u16 {
        self.digits % pow10(self.decimals)
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            write!(f, "{} {}", self.digits, self.unit.as_str())
        } else {
            write!(
                f,
                "{}.{:0width$} {}",
                self.whole(),
                self.fraction(),
                self.unit.as_str(),
                width = usize::from(self.decimals)
            )
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Readout {
    fn format(&self, f: defmt::Formatter) {
        let mut s: heapless::String<16> = heapless::String::new();
        core::fmt::write(&mut s, format_args!("{self}")).ok();
        defmt::write!(f, "{=str}", s.as_str());
    }
}

const fn pow10(exp: u8) -> u16 {
    match exp {
        0 => 1,
        1 => 10,
        2 => 100,
        _ => 1000,
    }
}

/// Step indicator level, 0 ..= 6
///
/// Non-decade steps show the lowest level.
#[must_use]
pub const fn step_level(step_hz: u32) -> u8 {
    match TuningStep::from_hz(step_hz) {
        Some(step) => step.level(),
        None => 0,
    }
}
