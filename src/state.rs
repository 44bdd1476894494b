//! Shared Tuner State
//!
//! The only state shared between the edge handlers and the controller loop.
//! Handlers may preempt the loop and each other at any point, so every field
//! is an atomic and every read-modify-write goes through `fetch_update`:
//! two edges that interleave can never lose a step.
//!
//! Fields are independent scalars and no ordering between them is relied
//! upon, so all accesses are `Relaxed`.

use crate::config::{clamp_frequency, TunerConfig};
use crate::encoder::{resolve_edge, Channel, DecoderKind, Direction, GrayState};
use crate::types::{next_step, wrap_step};
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU8, Ordering};

/// Edge callbacks, wired to whatever interrupt source the board offers
pub trait InputHandler {
    /// Encoder channel A changed; `high` is the level now on the line
    fn on_channel_a_change(&self, high: bool);

    /// Encoder channel B changed; `high` is the level now on the line
    fn on_channel_b_change(&self, high: bool);

    /// Push button falling edge
    fn on_button_press(&self);
}

/// Frequency accumulator, step size and channel latches
pub struct TunerState {
    /// Hz, may sit outside the legal range until the controller clamps it
    frequency: AtomicI32,
    /// Hz per detent
    step: AtomicU32,
    latch_a: AtomicBool,
    latch_b: AtomicBool,
    /// [`GrayState`] bits, only used by [`DecoderKind::GrayCode`]
    gray: AtomicU8,
    decoder: DecoderKind,
    /// Line level at rest, inverted away before Gray-code decoding
    detent_high: bool,
}

impl TunerState {
    /// State with the given startup values; usable in a `static`
    #[must_use]
    pub const fn new(config: TunerConfig) -> Self {
        Self {
            frequency: AtomicI32::new(config.start_frequency_hz),
            step: AtomicU32::new(config.start_step_hz),
            latch_a: AtomicBool::new(config.detent_high),
            latch_b: AtomicBool::new(config.detent_high),
            gray: AtomicU8::new(GrayState::Idle.bits()),
            decoder: config.decoder,
            detent_high: config.detent_high,
        }
    }

    /// Raw accumulator value
    #[must_use]
    pub fn frequency(&self) -> i32 {
        self.frequency.load(Ordering::Relaxed)
    }

    /// Current step size
    #[must_use]
    pub fn step(&self) -> u32 {
        self.step.load(Ordering::Relaxed)
    }

    /// Decoder in use
    #[must_use]
    pub const fn decoder(&self) -> DecoderKind {
        self.decoder
    }

    /// Latched (A, B) levels
    #[must_use]
    pub fn levels(&self) -> (bool, bool) {
        (
            self.latch_a.load(Ordering::Relaxed),
            self.latch_b.load(Ordering::Relaxed),
        )
    }

    /// Clamp the accumulator into range and return the clamped value
    ///
    /// The clamped value is only written back if no edge arrived since it
    /// was read; a racing edge wins and is picked up on the next poll.
    pub fn settle_frequency(&self) -> i32 {
        let raw = self.frequency();
        let clamped = clamp_frequency(raw);
        if clamped != raw {
            let _ = self.frequency.compare_exchange(
                raw,
                clamped,
                Ordering::Relaxed,
                Ordering::Relaxed,
            );
        }
        clamped
    }

    /// Wrap an underflowed step and return the settled value
    pub fn settle_step(&self) -> u32 {
        let raw = self.step();
        let wrapped = wrap_step(raw);
        if wrapped != raw {
            let _ = self
                .step
                .compare_exchange(raw, wrapped, Ordering::Relaxed, Ordering::Relaxed);
        }
        wrapped
    }

    /// Move the accumulator one step in `direction`
    fn apply(&self, direction: Direction) {
        let step = self.step();
        let _ = self
            .frequency
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |hz| {
                Some(direction.apply(hz, step))
            });
    }

    fn on_edge(&self, channel: Channel, high: bool) {
        let (own, other) = match channel {
            Channel::A => (&self.latch_a, &self.latch_b),
            Channel::B => (&self.latch_b, &self.latch_a),
        };

        let step = match self.decoder {
            DecoderKind::EdgeLatch => {
                let step = resolve_edge(channel, high, other.load(Ordering::Relaxed));
                own.store(high, Ordering::Relaxed);
                step
            }
            DecoderKind::GrayCode => {
                own.store(high, Ordering::Relaxed);
                let (a, b) = self.levels();
                let (a, b) = (a != self.detent_high, b != self.detent_high);
                // The closure is pure, so re-running it on the winning
                // previous value reproduces the decision it stored
                self.gray
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                        Some(GrayState::from_bits(bits).advance(a, b).0.bits())
                    })
                    .ok()
                    .and_then(|prev| GrayState::from_bits(prev).advance(a, b).1)
            }
        };

        if let Some(direction) = step {
            self.apply(direction);
        }
    }
}

impl Default for TunerState {
    fn default() -> Self {
        Self::new(TunerConfig::new())
    }
}

impl InputHandler for TunerState {
    fn on_channel_a_change(&self, high: bool) {
        self.on_edge(Channel::A, high);
    }

    fn on_channel_b_change(&self, high: bool) {
        self.on_edge(Channel::B, high);
    }

    fn on_button_press(&self) {
        let _ = self
            .step
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |step| Some(next_step(step)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_config() {
        let state = TunerState::default();
        assert_eq!(state.frequency(), 1000);
        assert_eq!(state.step(), 1000);
        assert_eq!(state.levels(), (false, false));
        assert_eq!(state.decoder(), DecoderKind::EdgeLatch);
    }

    #[test]
    fn settle_writes_back_clamped_value() {
        let state = TunerState::default();
        state.on_channel_b_change(true); // 1000 - 1000 = 0
        state.on_channel_b_change(false);
        state.on_channel_b_change(true); // -1000
        assert_eq!(state.frequency(), -1000);
        assert_eq!(state.settle_frequency(), 0);
        assert_eq!(state.frequency(), 0);
    }

    #[test]
    fn settle_step_repairs_zero() {
        let state = TunerState::new(TunerConfig {
            start_step_hz: 0,
            ..TunerConfig::new()
        });
        assert_eq!(state.settle_step(), 1_000_000);
        assert_eq!(state.step(), 1_000_000);
    }

    #[test]
    fn button_divides_step() {
        let state = TunerState::default();
        state.on_button_press();
        assert_eq!(state.step(), 100);
    }
}
