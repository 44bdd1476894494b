//! Peripheral Drivers
//!
//! High-level drivers for external ICs and peripherals.
//! The AD9850 driver is HAL-independent and lives in [`crate::dds`];
//! this module holds the parts that need embassy peripherals.

pub mod oled;
