//! DDS VFO Main Application
//!
//! Entry point for the STM32G474 AD9850 VFO firmware.
//! Initializes hardware, wires the encoder edges to the shared tuner state
//! and runs the controller loop.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use {defmt_rtt as _, panic_probe as _};

use dds_vfo::prelude::*;

#[cfg(feature = "oled")]
use dds_vfo::drivers::oled::{OledDisplay, ScreenSignal, Ssd1306};
#[cfg(feature = "oled")]
use embassy_stm32::i2c::I2c;
#[cfg(feature = "oled")]
use embassy_stm32::time::Hertz;
#[cfg(feature = "oled")]
use embassy_stm32::{bind_interrupts, peripherals};

/// Encoder common pin to ground with pull-ups, so the lines idle high
const TUNER_CONFIG: TunerConfig = TunerConfig::new().with_detent_high(true);

/// Shared between the edge tasks and the controller loop
static TUNER: TunerState = TunerState::new(TUNER_CONFIG);

/// Latest screen for the display task
#[cfg(feature = "oled")]
static SCREEN: ScreenSignal = ScreenSignal::new();

// Bind interrupt handlers
#[cfg(feature = "oled")]
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("DDS VFO Firmware v{}", env!("CARGO_PKG_VERSION"));

    // Initialize STM32G474 peripherals with default clock configuration
    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized, {}", TUNER_CONFIG);

    // Encoder channels and button on EXTI lines 0-2, pulled up
    let enc_a = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);
    let enc_b = ExtiInput::new(p.PA1, p.EXTI1, Pull::Up);
    let button = ExtiInput::new(p.PA2, p.EXTI2, Pull::Up);

    // AD9850 control lines
    let w_clk = Output::new(p.PB0, Level::Low, Speed::VeryHigh);
    let fq_ud = Output::new(p.PB1, Level::Low, Speed::VeryHigh);
    let data = Output::new(p.PB2, Level::Low, Speed::VeryHigh);
    let reset = Output::new(p.PB3, Level::Low, Speed::VeryHigh);

    let dds = match Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode() {
        Ok(dds) => dds,
        Err(never) => match never {},
    };
    info!("AD9850 ready, reference {} Hz", dds.reference_hz());

    #[cfg(feature = "oled")]
    let display = {
        // PB8 = SCL, PB9 = SDA for I2C1 on STM32G474
        let i2c = I2c::new(
            p.I2C1,
            p.PB8, // SCL
            p.PB9, // SDA
            Irqs,
            p.DMA1_CH1,
            p.DMA1_CH2,
            Hertz(I2C_FREQUENCY_HZ),
            Default::default(),
        );
        spawner.spawn(display_task(Ssd1306::new(i2c))).unwrap();
        OledDisplay::new(&SCREEN)
    };
    #[cfg(not(feature = "oled"))]
    let display = NullDisplay;

    // Status LED (typically on PA5 for Nucleo boards)
    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(channel_a_task(enc_a)).unwrap();
    spawner.spawn(channel_b_task(enc_b)).unwrap();
    spawner.spawn(button_task(button)).unwrap();

    info!("Tasks spawned, entering controller loop");

    let mut controller = Controller::new(&TUNER, dds, display);
    match controller.run().await {
        Ok(never) | Err(never) => match never {},
    }
}

/// Encoder channel A, both edges
#[embassy_executor::task]
async fn channel_a_task(mut pin: ExtiInput<'static>) {
    loop {
        pin.wait_for_any_edge().await;
        TUNER.on_channel_a_change(pin.is_high());
    }
}

/// Encoder channel B, both edges
#[embassy_executor::task]
async fn channel_b_task(mut pin: ExtiInput<'static>) {
    loop {
        pin.wait_for_any_edge().await;
        TUNER.on_channel_b_change(pin.is_high());
    }
}

/// Push button, active low, press edge only
#[embassy_executor::task]
async fn button_task(mut pin: ExtiInput<'static>) {
    loop {
        pin.wait_for_falling_edge().await;
        TUNER.on_button_press();
    }
}

/// Renders published screens; bus errors are logged and the next screen retried
#[cfg(feature = "oled")]
#[embassy_executor::task]
async fn display_task(mut panel: Ssd1306<'static>) {
    if let Err(e) = panel.init().await {
        warn!("display init failed: {}", e);
    }
    loop {
        let screen = SCREEN.wait().await;
        if let Err(e) = panel.show(&screen).await {
            warn!("display update failed: {}", e);
        }
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    let on = Duration::from_millis(HEARTBEAT_PERIOD_MS / 10);
    let off = Duration::from_millis(HEARTBEAT_PERIOD_MS - HEARTBEAT_PERIOD_MS / 10);
    loop {
        led.set_high();
        Timer::after(on).await;
        led.set_low();
        Timer::after(off).await;
    }
}
