//! DDS VFO Firmware Library
//!
//! Core functionality for an STM32G474-based variable frequency oscillator
//! built around an AD9850 direct digital synthesis chip. A rotary encoder
//! tunes the output frequency, its push button cycles the tuning step, and
//! an optional OLED shows both.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │        Controller loop   │   Display collaborator            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 SHARED TUNER STATE (atomics)                 │
//! │  Edge latches  │  Frequency accumulator  │  Step size        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  AD9850 serial bus  │  SSD1306 over I2C  │  EXTI edges       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Interrupt-safe shared state**: every value touched from edge handlers
//!   lives in [`state::TunerState`] and is updated with atomic RMW operations
//! - **Type-driven design**: the DDS driver cannot send a frame before it has
//!   been reset into serial-load mode
//! - **No unsafe in application code**
//! - **Functional core, imperative shell**: tuning word math, decoding and
//!   readout formatting are pure and tested on the host
//! - **Explicit error handling**: pin and bus failures propagate as `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must stay first so the logging macros are visible to every module below
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Safe wrappers over STM32G474 peripherals used by the drivers.
#[cfg(feature = "oled")]
pub mod hal;

/// Peripheral Drivers
///
/// Drivers for external parts that need the embassy HAL (the OLED panel).
#[cfg(feature = "oled")]
pub mod drivers;

/// AD9850 Direct Digital Synthesis
///
/// Tuning word codec and the bit-banged serial load protocol.
pub mod dds;

/// Quadrature decoding
///
/// Pure edge-resolution logic for the tuning encoder.
pub mod encoder;

/// Shared tuner state
///
/// The atomic state written by edge handlers and read by the controller.
pub mod state;

/// Controller Loop
///
/// Observes the shared state and pushes changes to the DDS and display.
pub mod controller;

/// Display collaborator
///
/// Display capability trait and readout formatting.
pub mod display;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::controller::{Controller, PollOutcome};
    pub use crate::dds::serial::{Ad9850, FrequencyOutput};
    pub use crate::display::{DisplayDriver, NullDisplay};
    pub use crate::state::{InputHandler, TunerState};
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
