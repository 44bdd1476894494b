//! Tuning Word Codec
//!
//! Converts between output frequency and the AD9850 tuning word, and lays
//! the word out as the 40-bit serial frame the chip expects. This module is
//! testable on the host.
//!
//! # Theory of Operation
//!
//! The DDS adds the tuning word to a 32-bit phase accumulator once per
//! reference clock cycle, so the output frequency is:
//!
//! ```text
//! FOUT = W × FREF / 2^32        W = floor(FOUT × 2^32 / FREF)
//! ```
//!
//! With FREF = 125 MHz one word step is FREF / 2^32 ≈ 0.0291 Hz.
//!
//! # Frame layout
//!
//! ```text
//! byte 0   byte 1   byte 2   byte 3   byte 4
//! W[7:0]   W[15:8]  W[23:16] W[31:24] control (0x00)
//! ```
//!
//! Each byte goes out LSB first, so W0 is the first bit on the wire.

use crate::config::REFERENCE_CLOCK_HZ;
use fixed::types::U32F32;

/// Size of the phase accumulator the tuning word divides (2^32)
const ACCUMULATOR_SPAN: u64 = 1 << 32;

/// Control byte appended to every frame
///
/// Bits 0-1 select the factory test modes and must be zero; the phase and
/// power-down bits are left at zero as well.
pub const CONTROL_BYTE: u8 = 0x00;

/// Number of bytes in a serial frame
pub const FRAME_LEN: usize = 5;

/// Number of bits clocked in per frame
pub const FRAME_BITS: usize = FRAME_LEN * 8;

/// One serial load: four tuning word bytes and the control byte
pub type Frame = [u8; FRAME_LEN];

/// Tuning word for an integer frequency with the board's reference clock
#[must_use]
pub const fn tuning_word(hz: u32) -> u32 {
    tuning_word_with_reference(hz, REFERENCE_CLOCK_HZ)
}

/// Tuning word for an integer frequency and an arbitrary reference clock
///
/// Exact floor division in 64-bit arithmetic. Frequencies at or above the
/// reference saturate at `u32::MAX` rather than wrapping.
///
/// # Panics
///
/// Panics if `reference_hz` is zero.
#[must_use]
pub const fn tuning_word_with_reference(hz: u32, reference_hz: u32) -> u32 {
    let word = (hz as u64 * ACCUMULATOR_SPAN) / reference_hz as u64;
    if word > u32::MAX as u64 {
        u32::MAX
    } else {
        word as u32
    }
}

/// Tuning word for a real-valued frequency
///
/// Truncates toward zero. Negative or NaN input gives 0 and oversized input
/// gives `u32::MAX`; nothing here can panic.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn tuning_word_f64(hz: f64) -> u32 {
    (hz * ACCUMULATOR_SPAN as f64 / f64::from(REFERENCE_CLOCK_HZ)) as u32
}

/// Frequency actually synthesized for a tuning word
#[must_use]
pub fn decode(word: u32) -> U32F32 {
    decode_with_reference(word, REFERENCE_CLOCK_HZ)
}

/// Frequency synthesized for a tuning word and an arbitrary reference clock
///
/// `W × FREF` is already the result scaled by 2^32, which is exactly the
/// bit pattern of a `U32F32`.
#[must_use]
pub fn decode_with_reference(word: u32, reference_hz: u32) -> U32F32 {
    U32F32::from_bits(u64::from(word) * u64::from(reference_hz))
}

/// Serial frame for a tuning word
#[must_use]
pub const fn frame(word: u32) -> Frame {
    let w = word.to_le_bytes();
    [w[0], w[1], w[2], w[3], CONTROL_BYTE]
}

/// Frame for an integer frequency, the usual entry point
#[must_use]
pub const fn encode(hz: u32) -> Frame {
    frame(tuning_word(hz))
}

/// Tuning word carried by a frame
#[must_use]
pub const fn word_from_frame(frame: &Frame) -> u32 {
    u32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]])
}

/// Bits of a frame in wire order (byte 0 first, each byte LSB first)
pub fn frame_bits(frame: &Frame) -> impl Iterator<Item = bool> + '_ {
    frame
        .iter()
        .flat_map(|&byte| (0..8).map(move |bit| (byte >> bit) & 1 == 1))
}
