//! I2C Bus Abstractions
//!
//! Async I2C communication for the OLED panel.
//! Uses embassy-stm32 async I2C driver with DMA.

use embassy_stm32::i2c::{Error as I2cError, I2c};
use embassy_stm32::mode::Async;

/// I2C operation result
pub type I2cResult<T> = Result<T, I2cError>;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// SSD1306 OLED display address
    pub const SSD1306: Self = Self(crate::config::DISPLAY_I2C_ADDR);

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Owned I2C bus
pub struct I2cBus<'d> {
    i2c: I2c<'d, Async>,
}

impl<'d> I2cBus<'d> {
    /// Wrap an initialised async I2C peripheral
    #[must_use]
    pub fn new(i2c: I2c<'d, Async>) -> Self {
        Self { i2c }
    }

    /// Write bytes to a device
    pub async fn write(&mut self, addr: I2cAddress, data: &[u8]) -> I2cResult<()> {
        self.i2c.write(addr.addr(), data).await
    }

    /// Send a stream of bytes behind a fixed prefix byte
    ///
    /// Splits `data` into transfers of at most `N - 1` payload bytes, each
    /// starting with `prefix`. SSD1306 command and data streams both work
    /// this way. `N` must leave room for at least one payload byte; smaller
    /// buffers are rejected at compile time.
    pub async fn write_prefixed<const N: usize>(
        &mut self,
        addr: I2cAddress,
        prefix: u8,
        data: &[u8],
    ) -> I2cResult<()> {
        const { assert!(N > 1, "transfer buffer needs a prefix and one payload byte") };
        let mut buf = [0u8; N];
        buf[0] = prefix;
        for chunk in data.chunks(N - 1) {
            buf[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(addr.addr(), &buf[..=chunk.len()]).await?;
        }
        Ok(())
    }
}
