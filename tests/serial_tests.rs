//! AD9850 Serial Protocol Tests
//!
//! Records every write on the four control lines in one shared log and
//! checks the wire-level protocol: startup order, bit framing and latching.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test serial_tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dds_vfo::dds::codec::{self, FRAME_BITS};
use dds_vfo::dds::serial::{Ad9850, FrequencyOutput};
use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line {
    Reset,
    Data,
    FqUd,
    WClk,
}

#[derive(Debug, PartialEq, Eq)]
struct PinFault;

impl Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

type Log = Rc<RefCell<Vec<(Line, bool)>>>;

/// Output pin that appends its writes to a shared log
///
/// `budget` is shared by all probes; once it runs out every write fails.
#[derive(Clone)]
struct Probe {
    line: Line,
    log: Log,
    budget: Rc<Cell<Option<usize>>>,
}

impl Probe {
    fn write(&mut self, level: bool) -> Result<(), PinFault> {
        if let Some(left) = self.budget.get() {
            if left == 0 {
                return Err(PinFault);
            }
            self.budget.set(Some(left - 1));
        }
        self.log.borrow_mut().push((self.line, level));
        Ok(())
    }
}

impl ErrorType for Probe {
    type Error = PinFault;
}

impl OutputPin for Probe {
    fn set_low(&mut self) -> Result<(), PinFault> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.write(true)
    }
}

struct Bench {
    log: Log,
    budget: Rc<Cell<Option<usize>>>,
    pins: (Probe, Probe, Probe, Probe),
}

impl Bench {
    fn new() -> Self {
        let log: Log = Rc::default();
        let budget = Rc::new(Cell::new(None));
        let probe = |line| Probe {
            line,
            log: Rc::clone(&log),
            budget: Rc::clone(&budget),
        };
        let pins = (
            probe(Line::Reset),
            probe(Line::Data),
            probe(Line::FqUd),
            probe(Line::WClk),
        );
        Self { log, budget, pins }
    }

    fn take_log(&self) -> Vec<(Line, bool)> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

/// What the chip would have seen
#[derive(Debug, Default)]
struct Wire {
    /// DATA level at each W_CLK rising edge
    bits: Vec<bool>,
    /// Bits shifted in at each FQ_UD rising edge
    latches: Vec<usize>,
}

fn analyse(log: &[(Line, bool)]) -> Wire {
    let mut wire = Wire::default();
    let mut data = false;
    let mut w_clk = false;
    let mut fq_ud = false;
    for &(line, level) in log {
        match line {
            Line::Data => data = level,
            Line::WClk => {
                if level && !w_clk {
                    wire.bits.push(data);
                }
                w_clk = level;
            }
            Line::FqUd => {
                if level && !fq_ud {
                    wire.latches.push(wire.bits.len());
                }
                fq_ud = level;
            }
            Line::Reset => {}
        }
    }
    wire
}

fn word_from_bits(bits: &[bool]) -> u32 {
    bits.iter()
        .take(32)
        .enumerate()
        .fold(0, |acc, (i, &b)| acc | (u32::from(b) << i))
}

// =============================================================================
// Startup Sequence Tests
// =============================================================================

#[test]
fn test_startup_order_is_reset_wclk_fqud() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let _dds = Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode().unwrap();

    assert_eq!(
        bench.take_log(),
        vec![
            (Line::Reset, true),
            (Line::Reset, false),
            (Line::WClk, true),
            (Line::WClk, false),
            (Line::FqUd, true),
            (Line::FqUd, false),
        ]
    );
}

#[test]
fn test_new_does_not_touch_pins() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let _dds = Ad9850::new(reset, data, fq_ud, w_clk);
    assert!(bench.take_log().is_empty());
}

// =============================================================================
// Frame Transmission Tests
// =============================================================================

#[test]
fn test_frame_is_forty_bits_then_one_latch() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let mut dds = Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode().unwrap();
    bench.take_log();

    dds.set_frequency(2100).unwrap();
    let log = bench.take_log();
    let wire = analyse(&log);

    assert_eq!(wire.bits.len(), FRAME_BITS);
    assert_eq!(wire.latches, vec![FRAME_BITS]);
    assert_eq!(word_from_bits(&wire.bits), 72);
    assert!(wire.bits[32..].iter().all(|&b| !b), "control byte must be zero");

    // FQ_UD pulse is the very last thing on the bus
    assert_eq!(&log[log.len() - 2..], &[(Line::FqUd, true), (Line::FqUd, false)]);
    // RESET is never touched in steady state
    assert!(log.iter().all(|&(line, _)| line != Line::Reset));
}

#[test]
fn test_each_bit_is_data_then_clock_pulse() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let mut dds = Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode().unwrap();
    bench.take_log();

    dds.load(&codec::frame(0xA5A5_0F0F)).unwrap();
    let log = bench.take_log();

    // 40 × (DATA, W_CLK high, W_CLK low) then FQ_UD high, low
    assert_eq!(log.len(), FRAME_BITS * 3 + 2);
    for triple in log[..FRAME_BITS * 3].chunks(3) {
        assert_eq!(triple[0].0, Line::Data);
        assert_eq!(triple[1], (Line::WClk, true));
        assert_eq!(triple[2], (Line::WClk, false));
    }
}

#[test]
fn test_program_trait_matches_set_frequency() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let mut dds = Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode().unwrap();
    bench.take_log();

    dds.program(7_074_000).unwrap();
    let wire = analyse(&bench.take_log());
    assert_eq!(word_from_bits(&wire.bits), codec::tuning_word(7_074_000));
}

#[test]
fn test_custom_reference_clock() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let mut dds = Ad9850::with_reference(reset, data, fq_ud, w_clk, 100_000_000)
        .into_serial_mode()
        .unwrap();
    assert_eq!(dds.reference_hz(), 100_000_000);
    bench.take_log();

    dds.set_frequency(1_000_000).unwrap();
    let wire = analyse(&bench.take_log());
    // 2^32 / 100
    assert_eq!(word_from_bits(&wire.bits), 42_949_672);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_partial_frame_is_never_latched() {
    let bench = Bench::new();
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let mut dds = Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode().unwrap();
    bench.take_log();

    // Enough writes for 20 bits, then the bus dies
    bench.budget.set(Some(20 * 3));
    assert_eq!(dds.set_frequency(2100), Err(PinFault));

    let wire = analyse(&bench.take_log());
    assert_eq!(wire.bits.len(), 20);
    assert!(wire.latches.is_empty());
}

#[test]
fn test_startup_failure_is_reported() {
    let bench = Bench::new();
    bench.budget.set(Some(3));
    let (reset, data, fq_ud, w_clk) = bench.pins.clone();
    let result = Ad9850::new(reset, data, fq_ud, w_clk).into_serial_mode();
    assert!(result.is_err());

    // RESET pulse and W_CLK high made it out, FQ_UD never did
    let log = bench.take_log();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|&(line, _)| line != Line::FqUd));
}
