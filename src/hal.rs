//! Hardware Abstraction Layer
//!
//! Provides safe abstractions over STM32G474 peripherals.
//! Only the I2C bus is wrapped; the DDS and encoder lines are plain
//! embassy GPIO handles passed straight to their drivers.

pub mod i2c;
