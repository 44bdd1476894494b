//! OLED Display Driver
//!
//! SSD1306 128x64 panel on I2C, showing the frequency readout and the
//! tuning step indicator.
//!
//! The controller loop must never wait on the bus, so [`OledDisplay`] only
//! records the new [`Screen`] and signals it. [`Ssd1306`] is owned by a
//! separate task that waits on the signal, renders and flushes. Intermediate
//! screens are skipped when the encoder spins faster than the panel can be
//! redrawn; the latest one always wins.

use crate::display::{step_level, DisplayDriver, Readout, STEP_LEVELS};
use crate::hal::i2c::{I2cAddress, I2cBus, I2cResult};
use crate::types::TuningStep;
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// SSD1306 commands
mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte announcing a command stream
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a GDDRAM data stream
const CONTROL_DATA: u8 = 0x40;

/// Everything the panel shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    /// Frequency readout
    pub frequency: Readout,
    /// Step indicator level, 0 ..= 6
    pub step_level: u8,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            frequency: Readout::for_frequency(0),
            step_level: 0,
        }
    }
}

/// Latest screen, handed from the controller to the display task
pub type ScreenSignal = Signal<CriticalSectionRawMutex, Screen>;

/// [`DisplayDriver`] side of the panel
pub struct OledDisplay<'a> {
    signal: &'a ScreenSignal,
    screen: Screen,
}

impl<'a> OledDisplay<'a> {
    /// Publish screens through `signal`
    #[must_use]
    pub fn new(signal: &'a ScreenSignal) -> Self {
        Self {
            signal,
            screen: Screen::default(),
        }
    }
}

impl DisplayDriver for OledDisplay<'_> {
    fn show_frequency(&mut self, hz: u32) {
        self.screen.frequency = Readout::for_frequency(hz);
        self.signal.signal(self.screen);
    }

    fn show_step(&mut self, step_hz: u32) {
        self.screen.step_level = step_level(step_hz);
        self.signal.signal(self.screen);
    }
}

/// Display buffer (1 bit per pixel)
pub struct DisplayBuffer {
    /// Pixel data (128x64 / 8 = 1024 bytes)
    buffer: [u8; 1024],
}

impl DisplayBuffer {
    /// Create a new empty display buffer
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: [0; 1024] }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Set a pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }

        let byte_idx = (y / 8 * DISPLAY_WIDTH + x) as usize;
        let bit = 1 << (y % 8);

        if on {
            self.buffer[byte_idx] |= bit;
        } else {
            self.buffer[byte_idx] &= !bit;
        }
    }

    /// Get the raw buffer
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// Draw a screen into a buffer
///
/// Layout: readout digits in the large font across the top half, unit to
/// the right, and a seven-segment step bar with its label along the bottom.
pub fn render(buffer: &mut DisplayBuffer, screen: &Screen) {
    buffer.clear();

    let big = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    let readout = screen.frequency;
    let mut digits: String<8> = String::new();
    if readout.decimals == 0 {
        core::fmt::write(&mut digits, format_args!("{}", readout.digits)).ok();
    } else {
        core::fmt::write(
            &mut digits,
            format_args!(
                "{}.{:0width$}",
                readout.whole(),
                readout.fraction(),
                width = usize::from(readout.decimals)
            ),
        )
        .ok();
    }

    let _ = Text::with_baseline(&digits, Point::new(4, 8), big, Baseline::Top).draw(buffer);
    let _ = Text::with_baseline(readout.unit.as_str(), Point::new(100, 18), small, Baseline::Top)
        .draw(buffer);

    // Step bar: one cell per level, filled up to the current one
    let cell = Size::new(14, 8);
    for level in 0..STEP_LEVELS {
        let x = 4 + i32::from(level) * 17;
        let rect = Rectangle::new(Point::new(x, 42), cell);
        let style = if level <= screen.step_level {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        let _ = rect.into_styled(style).draw(buffer);
    }

    let label = TuningStep::ALL
        .get(usize::from(screen.step_level))
        .map_or("", |step| step.label());
    let _ = Text::with_baseline(label, Point::new(4, 54), small, Baseline::Top).draw(buffer);
}

/// SSD1306 panel on an owned I2C bus
pub struct Ssd1306<'d> {
    bus: I2cBus<'d>,
    buffer: DisplayBuffer,
}

impl<'d> Ssd1306<'d> {
    /// Create a new display driver
    #[must_use]
    pub fn new(i2c: I2c<'d, Async>) -> Self {
        Self {
            bus: I2cBus::new(i2c),
            buffer: DisplayBuffer::new(),
        }
    }

    /// Initialize the display
    pub async fn init(&mut self) -> I2cResult<()> {
        // Initialization sequence for SSD1306 128x64
        let init_cmds = [
            cmd::DISPLAY_OFF,
            cmd::SET_DISPLAY_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MULTIPLEX,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::DISPLAY_ON,
        ];

        self.commands(&init_cmds).await?;

        self.buffer.clear();
        self.flush().await
    }

    /// Render and flush a screen
    pub async fn show(&mut self, screen: &Screen) -> I2cResult<()> {
        render(&mut self.buffer, screen);
        self.flush().await
    }

    /// Flush the buffer to the display
    async fn flush(&mut self) -> I2cResult<()> {
        self.commands(&[cmd::COLUMN_ADDR, 0, 127, cmd::PAGE_ADDR, 0, 7])
            .await?;

        // 32 data bytes per transfer keeps within the I2C DMA chunking
        self.bus
            .write_prefixed::<33>(I2cAddress::SSD1306, CONTROL_DATA, self.buffer.as_bytes())
            .await
    }

    async fn commands(&mut self, cmds: &[u8]) -> I2cResult<()> {
        for &c in cmds {
            self.bus
                .write(I2cAddress::SSD1306, &[CONTROL_COMMAND, c])
                .await?;
        }
        Ok(())
    }
}
