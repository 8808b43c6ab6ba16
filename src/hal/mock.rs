//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and display traits,
//! enabling development and testing on desktop without physical hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockGpio`] | [`GpioPort`] | Records pin events, decodes TM1637 frames |
//! | [`MockDisplay`] | [`NumericDisplay`] | Tracks shown values |
//!
//! # Example
//!
//! ```rust
//! use adc_meter::tm1637::Tm1637;
//! use adc_meter::hal::MockGpio;
//!
//! let mut display = Tm1637::new(MockGpio::new(6, 7), 6, 7);
//! display.begin().unwrap();
//! display.render_number(1234, false).unwrap();
//!
//! // Decoded exactly as the display would see it
//! let frames = display.gpio().frames();
//! assert_eq!(frames[0].bytes, [0x40]);
//! assert_eq!(frames[1].bytes, [0xC0, 0x06, 0x5B, 0x4F, 0x66]);
//! assert_eq!(frames[2].bytes, [0x8C]);
//! ```
//!
//! [`GpioPort`]: crate::traits::GpioPort
//! [`NumericDisplay`]: crate::traits::NumericDisplay

use std::collections::HashMap;

use crate::segments::SegmentBuffer;
use crate::traits::{GpioPort, Level, NumericDisplay, PinId, PinMode};

// ============================================================================
// GPIO Mock
// ============================================================================

/// A single recorded GPIO operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpioEvent {
    /// `set_pin_mode(pin, mode)`.
    Mode(PinId, PinMode),
    /// `write_digital(pin, level)`.
    Write(PinId, Level),
    /// `read_digital(pin)` and the level it returned.
    Read(PinId, Level),
    /// `busy_wait_micros(us)`.
    Wait(u32),
}

/// One START-to-STOP transaction as seen by the receiving display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Bytes that completed all eight data bits and the ack pulse.
    pub bytes: Vec<u8>,
    /// Rising CLK edges inside the frame.
    pub clock_pulses: usize,
    /// Reads of the data line inside the frame.
    pub ack_reads: usize,
    /// Whether the frame ended with a STOP condition.
    pub stopped: bool,
}

/// Line state shared by the live mock and the frame decoder.
#[derive(Clone, Debug)]
struct Lines {
    latch: HashMap<PinId, Level>,
    mode: HashMap<PinId, PinMode>,
    dio: PinId,
    acknowledge: bool,
}

impl Lines {
    fn new(dio: PinId, acknowledge: bool) -> Self {
        Self {
            latch: HashMap::new(),
            mode: HashMap::new(),
            dio,
            acknowledge,
        }
    }

    fn apply(&mut self, event: &GpioEvent) {
        match *event {
            GpioEvent::Mode(pin, mode) => {
                self.mode.insert(pin, mode);
            }
            GpioEvent::Write(pin, level) => {
                self.latch.insert(pin, level);
            }
            GpioEvent::Read(..) | GpioEvent::Wait(_) => {}
        }
    }

    // Released lines float high, except DIO which the display pulls low
    // when it acknowledges.
    fn level(&self, pin: PinId) -> Level {
        match self.mode.get(&pin).copied().unwrap_or(PinMode::Output) {
            PinMode::Output => self.latch.get(&pin).copied().unwrap_or(Level::High),
            PinMode::Input if pin == self.dio && self.acknowledge => Level::Low,
            PinMode::Input => Level::High,
        }
    }
}

/// Mock GPIO port for testing the TM1637 driver.
///
/// Records every operation in [`events`](Self::events) and can replay them
/// through a model of the display's receiver with [`frames`](Self::frames).
/// The simulated display acknowledges every byte unless built
/// [`with_nack`](Self::with_nack).
///
/// # Example
///
/// ```rust
/// use adc_meter::hal::{GpioEvent, MockGpio};
/// use adc_meter::traits::{GpioPort, Level};
///
/// let mut gpio = MockGpio::new(6, 7);
/// gpio.write_digital(6, Level::Low).unwrap();
/// gpio.busy_wait_micros(50);
///
/// assert_eq!(gpio.events, [GpioEvent::Write(6, Level::Low), GpioEvent::Wait(50)]);
/// assert_eq!(gpio.total_wait_us(), 50);
/// ```
#[derive(Clone, Debug)]
pub struct MockGpio {
    /// Every operation in call order.
    pub events: Vec<GpioEvent>,
    clk: PinId,
    dio: PinId,
    lines: Lines,
    // Line state before the first recorded event.
    origin: Lines,
}

impl MockGpio {
    /// Creates a mock port with the display's clock and data pins.
    pub fn new(clk: PinId, dio: PinId) -> Self {
        let lines = Lines::new(dio, true);
        Self {
            events: Vec::new(),
            clk,
            dio,
            origin: lines.clone(),
            lines,
        }
    }

    /// Makes the simulated display withhold every acknowledgment.
    pub fn with_nack(mut self) -> Self {
        self.lines.acknowledge = false;
        self.origin.acknowledge = false;
        self
    }

    /// Current level on a line.
    pub fn level(&self, pin: PinId) -> Level {
        self.lines.level(pin)
    }

    /// Forgets recorded events; line state is kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.origin = self.lines.clone();
    }

    /// Sum of all busy-wait durations in microseconds.
    pub fn total_wait_us(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                GpioEvent::Wait(us) => u64::from(*us),
                _ => 0,
            })
            .sum()
    }

    /// Decodes the recorded events into transactions.
    ///
    /// A frame opens when DIO falls with CLK high and closes when DIO rises
    /// with CLK high. Data is sampled on each rising CLK edge; the ninth
    /// edge of a byte is the acknowledgment pulse, during which DIO changes
    /// are not treated as conditions. Bits left over when a frame closes are
    /// discarded.
    pub fn frames(&self) -> Vec<Frame> {
        let mut lines = self.origin.clone();
        let mut frames = Vec::new();
        let mut current: Option<Frame> = None;
        let mut bits = 0u8;
        let mut byte = 0u8;
        let mut in_ack = false;

        for event in &self.events {
            let clk_before = lines.level(self.clk);
            let dio_before = lines.level(self.dio);
            lines.apply(event);
            let clk_now = lines.level(self.clk);
            let dio_now = lines.level(self.dio);

            if let (GpioEvent::Read(pin, _), Some(frame)) = (event, current.as_mut()) {
                if *pin == self.dio {
                    frame.ack_reads += 1;
                }
            }

            if clk_before != clk_now {
                if clk_now.is_low() {
                    in_ack = false;
                    continue;
                }
                let Some(frame) = current.as_mut() else {
                    continue;
                };
                frame.clock_pulses += 1;
                if in_ack {
                    continue;
                }
                if bits == 8 {
                    frame.bytes.push(byte);
                    bits = 0;
                    byte = 0;
                    in_ack = true;
                } else {
                    if dio_now.is_high() {
                        byte |= 1 << bits;
                    }
                    bits += 1;
                }
            } else if dio_before != dio_now && clk_now.is_high() && !in_ack {
                if let Some(mut frame) = current.take() {
                    frame.stopped = dio_now.is_high();
                    frames.push(frame);
                }
                if dio_now.is_low() {
                    current = Some(Frame::default());
                }
                bits = 0;
                byte = 0;
            }
        }

        if let Some(frame) = current {
            frames.push(frame);
        }
        frames
    }
}

impl GpioPort for MockGpio {
    type Error = core::convert::Infallible;

    fn set_pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
        let event = GpioEvent::Mode(pin, mode);
        self.lines.apply(&event);
        self.events.push(event);
        Ok(())
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
        let event = GpioEvent::Write(pin, level);
        self.lines.apply(&event);
        self.events.push(event);
        Ok(())
    }

    fn read_digital(&mut self, pin: PinId) -> Result<Level, Self::Error> {
        let level = self.lines.level(pin);
        self.events.push(GpioEvent::Read(pin, level));
        Ok(level)
    }

    fn busy_wait_micros(&mut self, us: u32) {
        self.events.push(GpioEvent::Wait(us));
    }
}

// ============================================================================
// Display Mocks
// ============================================================================

/// Mock display for testing the refresh loop.
///
/// # Example
///
/// ```
/// use adc_meter::hal::MockDisplay;
/// use adc_meter::traits::NumericDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// display.show_number(42, false).unwrap();
/// assert_eq!(display.shown, [42]);
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Every value passed to `show_number`, in order.
    pub shown: Vec<i32>,
    /// Leading-zero flag of the last `show_number` call.
    pub last_leading_zero: Option<bool>,
    /// Last buffer passed to `show_segments`.
    pub last_segments: Option<SegmentBuffer>,
    /// Number of times `clear` was called.
    pub clear_count: usize,
    /// Whether `init` was called.
    pub initialized: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value shown, if any.
    pub fn last_shown(&self) -> Option<i32> {
        self.shown.last().copied()
    }
}

impl NumericDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.clear_count += 1;
        Ok(())
    }

    fn show_number(&mut self, value: i32, leading_zero: bool) -> Result<(), ()> {
        self.shown.push(value);
        self.last_leading_zero = Some(leading_zero);
        Ok(())
    }

    fn show_segments(&mut self, cells: &SegmentBuffer) -> Result<(), ()> {
        self.last_segments = Some(*cells);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLK: PinId = 2;
    const DIO: PinId = 3;

    // Drives the bus by hand, independent of the driver.
    fn start(gpio: &mut MockGpio) {
        gpio.write_digital(CLK, Level::High).unwrap();
        gpio.write_digital(DIO, Level::High).unwrap();
        gpio.write_digital(DIO, Level::Low).unwrap();
        gpio.write_digital(CLK, Level::Low).unwrap();
    }

    fn stop(gpio: &mut MockGpio) {
        gpio.write_digital(CLK, Level::Low).unwrap();
        gpio.write_digital(DIO, Level::Low).unwrap();
        gpio.write_digital(CLK, Level::High).unwrap();
        gpio.write_digital(DIO, Level::High).unwrap();
    }

    fn send(gpio: &mut MockGpio, byte: u8) {
        for i in 0..8 {
            gpio.write_digital(CLK, Level::Low).unwrap();
            gpio.write_digital(DIO, Level::from((byte >> i) & 1 == 1)).unwrap();
            gpio.write_digital(CLK, Level::High).unwrap();
        }
        gpio.write_digital(CLK, Level::Low).unwrap();
        gpio.set_pin_mode(DIO, PinMode::Input).unwrap();
        gpio.write_digital(CLK, Level::High).unwrap();
        gpio.read_digital(DIO).unwrap();
        gpio.write_digital(CLK, Level::Low).unwrap();
        gpio.set_pin_mode(DIO, PinMode::Output).unwrap();
    }

    #[test]
    fn lines_idle_high() {
        let gpio = MockGpio::new(CLK, DIO);
        assert_eq!(gpio.level(CLK), Level::High);
        assert_eq!(gpio.level(DIO), Level::High);
    }

    #[test]
    fn released_dio_reads_ack() {
        let mut gpio = MockGpio::new(CLK, DIO);
        gpio.set_pin_mode(DIO, PinMode::Input).unwrap();
        assert_eq!(gpio.read_digital(DIO).unwrap(), Level::Low);

        let mut gpio = MockGpio::new(CLK, DIO).with_nack();
        gpio.set_pin_mode(DIO, PinMode::Input).unwrap();
        assert_eq!(gpio.read_digital(DIO).unwrap(), Level::High);
    }

    #[test]
    fn latch_applies_when_output_again() {
        let mut gpio = MockGpio::new(CLK, DIO).with_nack();
        gpio.set_pin_mode(DIO, PinMode::Input).unwrap();
        gpio.write_digital(DIO, Level::Low).unwrap();
        assert_eq!(gpio.level(DIO), Level::High);
        gpio.set_pin_mode(DIO, PinMode::Output).unwrap();
        assert_eq!(gpio.level(DIO), Level::Low);
    }

    #[test]
    fn decodes_hand_driven_frame() {
        let mut gpio = MockGpio::new(CLK, DIO);
        start(&mut gpio);
        send(&mut gpio, 0xA5);
        send(&mut gpio, 0x01);
        stop(&mut gpio);

        let frames = gpio.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes, [0xA5, 0x01]);
        assert_eq!(frames[0].ack_reads, 2);
        assert_eq!(frames[0].clock_pulses, 19);
        assert!(frames[0].stopped);
    }

    #[test]
    fn unterminated_frame_is_reported() {
        let mut gpio = MockGpio::new(CLK, DIO);
        start(&mut gpio);
        send(&mut gpio, 0x40);

        let frames = gpio.frames();
        assert_eq!(frames.len(), 1);
        assert!(!frames[0].stopped);
    }

    #[test]
    fn decoding_after_clear_events() {
        let mut gpio = MockGpio::new(CLK, DIO);
        start(&mut gpio);
        send(&mut gpio, 0x11);
        stop(&mut gpio);
        gpio.clear_events();

        start(&mut gpio);
        send(&mut gpio, 0x22);
        stop(&mut gpio);

        let frames = gpio.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes, [0x22]);
    }

    #[test]
    fn mock_display_records_calls() {
        let mut display = MockDisplay::new();
        display.init().unwrap();
        display.show_number(5, true).unwrap();
        display.show_segments(&[1, 2, 3, 4]).unwrap();
        display.clear().unwrap();

        assert!(display.initialized);
        assert_eq!(display.last_shown(), Some(5));
        assert_eq!(display.last_leading_zero, Some(true));
        assert_eq!(display.last_segments, Some([1, 2, 3, 4]));
        assert_eq!(display.clear_count, 1);
    }
}
