//! AD9850 Direct Digital Synthesis
//!
//! The AD9850 produces a sine wave whose frequency is a fraction of its
//! reference clock. The fraction is a 32-bit tuning word, loaded together
//! with a control byte as a 40-bit serial frame.
//!
//! - [`codec`]: frequency to tuning word, frame layout (pure)
//! - [`serial`]: bit-banged load protocol over four GPIO lines

pub mod codec;
pub mod serial;
