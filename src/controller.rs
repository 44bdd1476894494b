//! Controller Loop
//!
//! Background half of the firmware. Edge handlers only touch the atomic
//! [`TunerState`]; the controller notices what changed since its last look
//! and does the slow work: clamping, programming the DDS and updating the
//! display.
//!
//! Every poll is bounded: two atomic loads, and at most one 40-bit frame
//! plus two display calls. Nothing waits on anything.

use crate::dds::serial::FrequencyOutput;
use crate::display::{DisplayDriver, Readout};
use crate::state::TunerState;
use core::fmt::Write;

/// What a poll pushed out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Frequency programmed, if it changed
    pub frequency: Option<u32>,
    /// Step shown, if it changed
    pub step: Option<u32>,
}

impl PollOutcome {
    /// Nothing changed
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.frequency.is_none() && self.step.is_none()
    }
}

/// Polling controller
pub struct Controller<'s, O, D> {
    state: &'s TunerState,
    output: O,
    display: D,
    /// Last frequency programmed, `None` until the first poll
    last_frequency: Option<i32>,
    /// Last step shown, `None` until the first poll
    last_step: Option<u32>,
}

impl<'s, O, D> Controller<'s, O, D>
where
    O: FrequencyOutput,
    D: DisplayDriver,
{
    /// Create a controller; the first [`poll`](Self::poll) pushes everything
    #[must_use]
    pub const fn new(state: &'s TunerState, output: O, display: D) -> Self {
        Self {
            state,
            output,
            display,
            last_frequency: None,
            last_step: None,
        }
    }

    /// One pass of the loop
    ///
    /// If the accumulator moved, it is clamped, written back, programmed and
    /// displayed. If the step moved, an underflowed value is wrapped and the
    /// indicator updated.
    ///
    /// # Errors
    ///
    /// Returns the output's error if the frequency could not be programmed.
    /// The snapshot is left untouched, so the next poll tries again.
    pub fn poll(&mut self) -> Result<PollOutcome, O::Error> {
        let mut outcome = PollOutcome::default();

        if self.last_frequency != Some(self.state.frequency()) {
            let hz = self.state.settle_frequency();
            // Settled values are never negative
            let hz_u = hz.unsigned_abs();

            self.output.program(hz_u)?;
            self.display.show_frequency(hz_u);
            self.log_frequency(hz_u);

            self.last_frequency = Some(hz);
            outcome.frequency = Some(hz_u);
        }

        if self.last_step != Some(self.state.step()) {
            let step = self.state.settle_step();
            self.display.show_step(step);
            debug!("step {} Hz", step);

            self.last_step = Some(step);
            outcome.step = Some(step);
        }

        Ok(outcome)
    }

    /// Poll forever, yielding to the executor between passes
    ///
    /// # Errors
    ///
    /// Only returns if programming the output fails.
    #[cfg(feature = "embedded")]
    pub async fn run(&mut self) -> Result<core::convert::Infallible, O::Error> {
        info!("controller loop running");
        loop {
            self.poll()?;
            embassy_futures::yield_now().await;
        }
    }

    fn log_frequency(&mut self, hz: u32) {
        let mut line: heapless::String<24> = heapless::String::new();
        if write!(line, "F {}", Readout::for_frequency(hz)).is_ok() {
            self.display.log_line(&line);
        }
        trace!("frequency {} Hz", hz);
    }
}
