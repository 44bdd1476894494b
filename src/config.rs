//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the DDS VFO hardware.
//! Frequency limits, step sizes, the DDS reference clock and pin mappings
//! are centralized here.

use crate::encoder::DecoderKind;

/// AD9850 reference oscillator (125 MHz module crystal)
pub const REFERENCE_CLOCK_HZ: u32 = 125_000_000;

/// Lowest frequency the controller will program
pub const MIN_FREQUENCY_HZ: i32 = 0;

/// Highest frequency the controller will program
pub const MAX_FREQUENCY_HZ: i32 = 32_000_000;

/// Frequency programmed at power-up
pub const START_FREQUENCY_HZ: i32 = 1000;

/// Smallest tuning step
pub const MIN_STEP_HZ: u32 = 1;

/// Largest tuning step, also the wrap target below [`MIN_STEP_HZ`]
pub const MAX_STEP_HZ: u32 = 1_000_000;

/// Tuning step at power-up
pub const START_STEP_HZ: u32 = 1000;

/// Factor the step shrinks by on each button press
pub const STEP_DIVISOR: u32 = 10;

/// I2C bus frequency for the SSD1306
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// Heartbeat LED period in milliseconds
pub const HEARTBEAT_PERIOD_MS: u64 = 1000;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Encoder channel A (EXTI0)
    pub const ENCODER_A: &str = "PA0";

    /// Encoder channel B (EXTI1)
    pub const ENCODER_B: &str = "PA1";

    /// Encoder push button, active low (EXTI2)
    pub const ENCODER_SW: &str = "PA2";

    /// AD9850 W_CLK (load clock)
    pub const DDS_W_CLK: &str = "PB0";

    /// AD9850 FQ_UD (frequency update latch)
    pub const DDS_FQ_UD: &str = "PB1";

    /// AD9850 D7 / serial DATA
    pub const DDS_DATA: &str = "PB2";

    /// AD9850 RESET
    pub const DDS_RESET: &str = "PB3";

    /// I2C1 SCL (display)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (display)
    pub const I2C1_SDA: &str = "PB9";
}

/// Runtime tuner settings
///
/// Everything here has a sensible default taken from the constants above;
/// a board variant can override individual fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TunerConfig {
    /// Frequency loaded into the accumulator at power-up
    pub start_frequency_hz: i32,
    /// Step size at power-up
    pub start_step_hz: u32,
    /// Quadrature decoding strategy
    pub decoder: DecoderKind,
    /// Both encoder lines sit high at a detent (common pin to ground,
    /// pull-ups enabled)
    pub detent_high: bool,
}

impl TunerConfig {
    /// Configuration built from the compile-time defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_frequency_hz: START_FREQUENCY_HZ,
            start_step_hz: START_STEP_HZ,
            decoder: DecoderKind::EdgeLatch,
            detent_high: false,
        }
    }

    /// Use a different quadrature decoder
    #[must_use]
    pub const fn with_decoder(mut self, decoder: DecoderKind) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set the line level the encoder rests at between detents
    #[must_use]
    pub const fn with_detent_high(mut self, detent_high: bool) -> Self {
        self.detent_high = detent_high;
        self
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TunerConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "TunerConfig(start={} Hz, step={} Hz, decoder={}, detent_high={})",
            self.start_frequency_hz,
            self.start_step_hz,
            self.decoder,
            self.detent_high
        );
    }
}

/// Clamp a raw accumulator value into the programmable range
#[must_use]
pub const fn clamp_frequency(hz: i32) -> i32 {
    if hz < MIN_FREQUENCY_HZ {
        MIN_FREQUENCY_HZ
    } else if hz > MAX_FREQUENCY_HZ {
        MAX_FREQUENCY_HZ
    } else {
        hz
    }
}
