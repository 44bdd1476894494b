//! Display Readout Tests
//!
//! Tests for frequency readout formatting and the step indicator.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test display_tests

use dds_vfo::config::{MAX_FREQUENCY_HZ, MAX_STEP_HZ, MIN_STEP_HZ};
use dds_vfo::display::{step_level, DisplayDriver, NullDisplay, Readout, Unit, STEP_LEVELS};
use dds_vfo::types::TuningStep;

fn shown(hz: u32) -> String {
    Readout::for_frequency(hz).to_string()
}

// =============================================================================
// Frequency Readout Tests
// =============================================================================

#[test]
fn test_hertz_band() {
    assert_eq!(shown(0), "0 Hz");
    assert_eq!(shown(1000), "1000 Hz");
    assert_eq!(shown(9_999), "9999 Hz");
}

#[test]
fn test_kilohertz_bands() {
    assert_eq!(shown(10_000), "10.00 kHz");
    assert_eq!(shown(12_345), "12.34 kHz");
    assert_eq!(shown(99_999), "99.99 kHz");
    assert_eq!(shown(123_456), "123.4 kHz");
    assert_eq!(shown(100_000), "100.0 kHz");
}

#[test]
fn test_megahertz_bands() {
    assert_eq!(shown(1_000_000), "1.000 MHz");
    assert_eq!(shown(7_074_000), "7.074 MHz");
    assert_eq!(shown(10_100_000), "10.10 MHz");
    assert_eq!(shown(MAX_FREQUENCY_HZ.unsigned_abs()), "32.00 MHz");
}

#[test]
fn test_lower_digits_are_truncated() {
    assert_eq!(shown(12_349), "12.34 kHz");
    assert_eq!(shown(7_074_999), "7.074 MHz");
}

#[test]
fn test_fraction_keeps_leading_zeros() {
    assert_eq!(shown(1_005_000), "1.005 MHz");
    assert_eq!(shown(20_050), "20.05 kHz");
}

#[test]
fn test_readout_never_exceeds_four_digits() {
    for hz in (0..=MAX_FREQUENCY_HZ.unsigned_abs()).step_by(997) {
        let r = Readout::for_frequency(hz);
        assert!(r.digits <= 9_999, "{hz} Hz gave {}", r.digits);
    }
}

#[test]
fn test_units_by_band() {
    assert_eq!(Readout::for_frequency(9_999).unit, Unit::Hz);
    assert_eq!(Readout::for_frequency(10_000).unit, Unit::KHz);
    assert_eq!(Readout::for_frequency(1_000_000).unit, Unit::MHz);
    assert_eq!(Unit::KHz.as_str(), "kHz");
}

// =============================================================================
// Step Indicator Tests
// =============================================================================

#[test]
fn test_step_levels_follow_decades() {
    let levels: Vec<u8> = TuningStep::ALL.iter().map(|s| step_level(s.as_hz())).collect();
    assert_eq!(levels.len(), usize::from(STEP_LEVELS));
    assert_eq!(step_level(MIN_STEP_HZ), 0);
    assert_eq!(step_level(MAX_STEP_HZ), STEP_LEVELS - 1);
    assert_eq!(step_level(1000), 3);
}

#[test]
fn test_non_decade_step_shows_lowest_level() {
    for step in [0, 2, 50, 999, 1_000_001] {
        assert_eq!(step_level(step), 0, "{step}");
    }
}

#[test]
fn test_null_display_is_silent() {
    let mut d = NullDisplay;
    d.show_frequency(2100);
    d.show_step(100);
    d.log_line("F 2100 Hz");
}
