//! AD9850 Serial Load Driver
//!
//! Bit-bangs the AD9850 serial interface over four GPIO lines:
//!
//! | Signal | Purpose                                  |
//! |--------|------------------------------------------|
//! | RESET  | clears registers, selects parallel mode  |
//! | W_CLK  | shifts DATA in on the rising edge        |
//! | FQ_UD  | copies the input register to the DDS core|
//! | DATA   | serial data (the chip's D7 pin)          |
//!
//! Pulses are plain high/low writes with no inserted delay. The datasheet
//! minimums (3.5 ns for W_CLK and RESET, 7 ns for FQ_UD) are far below one
//! GPIO write on the STM32G474.
//!
//! The driver is a typestate: [`Ad9850::new`] returns a [`mode::Init`] handle
//! that can only be turned into a [`mode::Serial`] handle by running the
//! serial-mode entry sequence. Frames can only be loaded in serial mode.

use super::codec::{self, Frame, FRAME_BITS};
use core::marker::PhantomData;
use embedded_hal::digital::{OutputPin, PinState};

/// Driver modes
pub mod mode {
    /// Pins claimed, chip not yet reset
    pub struct Init;
    /// Chip reset into serial-load mode, frames may be sent
    pub struct Serial;
}

/// Anything that can be told to produce a frequency
///
/// The controller only depends on this trait, so a board without a DDS (or
/// a test) can substitute its own sink.
pub trait FrequencyOutput {
    /// Error raised by the underlying bus
    type Error;

    /// Program the output to `hz`
    ///
    /// # Errors
    ///
    /// Returns the bus error if the frequency could not be sent.
    fn program(&mut self, hz: u32) -> Result<(), Self::Error>;
}

/// AD9850 on four output pins
pub struct Ad9850<Mode, Reset, Data, FqUd, WClk> {
    reset: Reset,
    data: Data,
    fq_ud: FqUd,
    w_clk: WClk,
    reference_hz: u32,
    _mode: PhantomData<Mode>,
}

impl<Reset, Data, FqUd, WClk, E> Ad9850<mode::Init, Reset, Data, FqUd, WClk>
where
    Reset: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
    FqUd: OutputPin<Error = E>,
    WClk: OutputPin<Error = E>,
{
    /// Claim the pins; nothing is written until [`Self::into_serial_mode`]
    #[must_use]
    pub fn new(reset: Reset, data: Data, fq_ud: FqUd, w_clk: WClk) -> Self {
        Self::with_reference(reset, data, fq_ud, w_clk, crate::config::REFERENCE_CLOCK_HZ)
    }

    /// Same as [`Self::new`] for a module with a non-standard oscillator
    #[must_use]
    pub fn with_reference(reset: Reset, data: Data, fq_ud: FqUd, w_clk: WClk, reference_hz: u32) -> Self {
        Self {
            reset,
            data,
            fq_ud,
            w_clk,
            reference_hz,
            _mode: PhantomData,
        }
    }

    /// Reset the chip and switch it to serial-load mode
    ///
    /// RESET pulse, then a single W_CLK pulse, then an FQ_UD pulse. The chip
    /// powers up in parallel mode; this exact order is what selects serial.
    ///
    /// # Errors
    ///
    /// Returns the first pin error; the chip state is then unknown and the
    /// pins are dropped with the handle.
    pub fn into_serial_mode(mut self) -> Result<Ad9850<mode::Serial, Reset, Data, FqUd, WClk>, E> {
        pulse(&mut self.reset)?;
        pulse(&mut self.w_clk)?;
        pulse(&mut self.fq_ud)?;

        debug!("AD9850 in serial mode");

        Ok(Ad9850 {
            reset: self.reset,
            data: self.data,
            fq_ud: self.fq_ud,
            w_clk: self.w_clk,
            reference_hz: self.reference_hz,
            _mode: PhantomData,
        })
    }
}

impl<Reset, Data, FqUd, WClk, E> Ad9850<mode::Serial, Reset, Data, FqUd, WClk>
where
    Reset: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
    FqUd: OutputPin<Error = E>,
    WClk: OutputPin<Error = E>,
{
    /// Set output frequency in Hz
    ///
    /// # Errors
    ///
    /// Returns the first pin error. The new word is not latched in that case.
    pub fn set_frequency(&mut self, hz: u32) -> Result<(), E> {
        let word = codec::tuning_word_with_reference(hz, self.reference_hz);
        trace!("AD9850 {} Hz -> word {=u32:#x}", hz, word);
        self.load(&codec::frame(word))
    }

    /// Clock a raw frame into the input register and latch it
    ///
    /// All 40 bits are shifted in before FQ_UD is pulsed, so a failure part
    /// way through leaves the previous frequency on the output.
    ///
    /// # Errors
    ///
    /// Returns the first pin error.
    pub fn load(&mut self, frame: &Frame) -> Result<(), E> {
        let mut clocked = 0;
        for bit in codec::frame_bits(frame) {
            self.data.set_state(PinState::from(bit))?;
            pulse(&mut self.w_clk)?;
            clocked += 1;
        }
        debug_assert_eq!(clocked, FRAME_BITS);

        pulse(&mut self.fq_ud)
    }

    /// Reference clock used for tuning word calculation
    #[must_use]
    pub const fn reference_hz(&self) -> u32 {
        self.reference_hz
    }

    /// Give the pins back
    pub fn release(self) -> (Reset, Data, FqUd, WClk) {
        (self.reset, self.data, self.fq_ud, self.w_clk)
    }
}

impl<Reset, Data, FqUd, WClk, E> FrequencyOutput for Ad9850<mode::Serial, Reset, Data, FqUd, WClk>
where
    Reset: OutputPin<Error = E>,
    Data: OutputPin<Error = E>,
    FqUd: OutputPin<Error = E>,
    WClk: OutputPin<Error = E>,
{
    type Error = E;

    fn program(&mut self, hz: u32) -> Result<(), E> {
        self.set_frequency(hz)
    }
}

/// High then low, no delay
fn pulse<P: OutputPin>(pin: &mut P) -> Result<(), P::Error> {
    pin.set_high()?;
    pin.set_low()
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    fn pulse_expectations(count: usize) -> Vec<PinTransaction> {
        (0..count)
            .flat_map(|_| {
                [
                    PinTransaction::set(PinState::High),
                    PinTransaction::set(PinState::Low),
                ]
            })
            .collect()
    }

    #[test]
    fn serial_mode_entry_pulses_each_control_line_once() {
        let mut reset = PinMock::new(&pulse_expectations(1));
        let mut data = PinMock::new(&[] as &[PinTransaction]);
        let mut fq_ud = PinMock::new(&pulse_expectations(1));
        let mut w_clk = PinMock::new(&pulse_expectations(1));

        let dds = Ad9850::new(reset.clone(), data.clone(), fq_ud.clone(), w_clk.clone())
            .into_serial_mode()
            .unwrap();
        drop(dds);

        reset.done();
        data.done();
        fq_ud.done();
        w_clk.done();
    }

    #[test]
    fn frame_clocks_forty_bits_then_latches_once() {
        let word = codec::tuning_word(2100);
        let frame = codec::frame(word);

        let data_expectations: Vec<PinTransaction> = codec::frame_bits(&frame)
            .map(|bit| PinTransaction::set(if bit { PinState::High } else { PinState::Low }))
            .collect();

        let mut reset = PinMock::new(&pulse_expectations(1));
        let mut data = PinMock::new(&data_expectations);
        let mut fq_ud = PinMock::new(&pulse_expectations(2));
        let mut w_clk = PinMock::new(&pulse_expectations(1 + FRAME_BITS));

        let mut dds = Ad9850::new(reset.clone(), data.clone(), fq_ud.clone(), w_clk.clone())
            .into_serial_mode()
            .unwrap();
        dds.set_frequency(2100).unwrap();
        drop(dds);

        reset.done();
        data.done();
        fq_ud.done();
        w_clk.done();
    }
}
