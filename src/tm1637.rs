//! TM1637 4-digit 7-segment display driver.
//!
//! The TM1637 speaks a two-wire synchronous protocol that looks like I2C
//! without addresses: the controller drives the clock line (CLK), data (DIO)
//! is open-drain, bytes go LSB-first, and the display acknowledges each byte
//! by pulling DIO low during a ninth clock pulse.
//!
//! # Transactions
//!
//! Every update is three bracketed transactions:
//!
//! ```text
//! START 0x40|0x44           STOP    addressing mode
//! START 0xC0+pos d0 [d1..]  STOP    start address + data
//! START 0x88|brightness     STOP    display on
//! ```
//!
//! The display-control command goes out with every update, so brightness
//! changes take effect on the next render.
//!
//! # Example
//!
//! ```rust
//! use adc_meter::tm1637::Tm1637;
//! use adc_meter::hal::MockGpio;
//! use adc_meter::segments::{digit_to_segments, BLANK, MINUS};
//!
//! let mut display = Tm1637::new(MockGpio::new(6, 7), 6, 7);
//! display.begin().unwrap();
//! display.render_number(-5, false).unwrap();
//!
//! let frames = display.gpio().frames();
//! assert_eq!(frames.len(), 3);
//! assert_eq!(frames[1].bytes, [0xC0, BLANK, BLANK, MINUS, digit_to_segments(5)]);
//! ```

use crate::config::DisplayConfig;
use crate::segments::{encode_number, SegmentBuffer, BLANK, CELL_COUNT};
use crate::traits::{GpioPort, Level, NumericDisplay, PinId, PinMode};

/// Data command: write with auto-incrementing address.
pub const CMD_AUTO_INCREMENT: u8 = 0x40;

/// Data command: write to a fixed address.
pub const CMD_FIXED_ADDRESS: u8 = 0x44;

/// Address command for cell 0; add the cell index for the others.
pub const CMD_START_ADDRESS: u8 = 0xC0;

/// Display control: display on, OR in the brightness level.
pub const CMD_DISPLAY_ON: u8 = 0x88;

/// Highest brightness level.
pub const MAX_BRIGHTNESS: u8 = 7;

/// Brightness after construction.
pub const DEFAULT_BRIGHTNESS: u8 = 4;

/// Settling time around clock edges and the acknowledgment sample.
pub const BIT_DELAY_US: u32 = 50;

/// Bit-banged TM1637 driver.
///
/// Owns the GPIO port for its two lines; nothing else may drive them while
/// the driver exists. Apart from brightness and the missed-ack counter the
/// driver holds no display state: the module keeps the last written cells.
///
/// # Type Parameter
///
/// - `G`: the GPIO implementation ([`GpioPort`] trait)
#[derive(Debug)]
pub struct Tm1637<G: GpioPort> {
    gpio: G,
    clk: PinId,
    dio: PinId,
    brightness: u8,
    missed_acks: u32,
}

impl<G: GpioPort> Tm1637<G> {
    /// Creates a driver on the given clock and data pins.
    ///
    /// Call [`begin`](Self::begin) before the first render.
    pub fn new(gpio: G, clk: PinId, dio: PinId) -> Self {
        Self {
            gpio,
            clk,
            dio,
            brightness: DEFAULT_BRIGHTNESS,
            missed_acks: 0,
        }
    }

    /// Creates a driver using the pins and brightness from `config`.
    pub fn from_config(gpio: G, config: &DisplayConfig) -> Self {
        let mut driver = Self::new(gpio, config.clk_pin, config.dio_pin);
        driver.set_brightness(config.brightness);
        driver
    }

    /// Configures both lines as outputs and leaves the bus idle (both high).
    pub fn begin(&mut self) -> Result<(), G::Error> {
        self.gpio.set_pin_mode(self.clk, PinMode::Output)?;
        self.gpio.set_pin_mode(self.dio, PinMode::Output)?;
        self.gpio.write_digital(self.clk, Level::High)?;
        self.gpio.write_digital(self.dio, Level::High)
    }

    /// Sets the brightness used by subsequent renders, clamped to 0..=7.
    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(MAX_BRIGHTNESS);
    }

    /// Current brightness level.
    #[inline]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Number of bytes the display failed to acknowledge since construction.
    #[inline]
    pub fn missed_acks(&self) -> u32 {
        self.missed_acks
    }

    /// Shared access to the GPIO port.
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Exclusive access to the GPIO port.
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Consumes the driver and returns the GPIO port.
    pub fn release(self) -> G {
        self.gpio
    }

    /// Blanks all four cells.
    pub fn clear(&mut self) -> Result<(), G::Error> {
        self.render_digits(&[BLANK; CELL_COUNT])
    }

    /// Writes four segment bitmaps, cell 0 first, in auto-increment mode.
    pub fn render_digits(&mut self, cells: &SegmentBuffer) -> Result<(), G::Error> {
        self.command(CMD_AUTO_INCREMENT)?;

        self.start()?;
        self.write_byte(CMD_START_ADDRESS)?;
        for &segments in cells {
            self.write_byte(segments)?;
        }
        self.stop()?;

        self.command(self.display_control())
    }

    /// Writes one cell in fixed-address mode.
    ///
    /// Positions past the last cell are ignored without touching the bus.
    pub fn render_cell(&mut self, pos: usize, segments: u8) -> Result<(), G::Error> {
        if pos >= CELL_COUNT {
            return Ok(());
        }

        self.command(CMD_FIXED_ADDRESS)?;

        self.start()?;
        self.write_byte(CMD_START_ADDRESS + pos as u8)?;
        self.write_byte(segments)?;
        self.stop()?;

        self.command(self.display_control())
    }

    /// Renders a signed value with the ones digit in the rightmost cell.
    ///
    /// See [`encode_number`] for the layout and overflow rules.
    pub fn render_number(&mut self, value: i32, leading_zero: bool) -> Result<(), G::Error> {
        log::trace!("tm1637: render {}", value);
        self.render_digits(&encode_number(value, leading_zero))
    }

    #[inline]
    fn display_control(&self) -> u8 {
        CMD_DISPLAY_ON | self.brightness
    }

    fn command(&mut self, byte: u8) -> Result<(), G::Error> {
        self.start()?;
        self.write_byte(byte)?;
        self.stop()
    }

    fn bit_delay(&mut self) {
        self.gpio.busy_wait_micros(BIT_DELAY_US);
    }

    fn clock(&mut self, level: Level) -> Result<(), G::Error> {
        self.gpio.write_digital(self.clk, level)?;
        self.bit_delay();
        Ok(())
    }

    // DIO falls while CLK is high.
    fn start(&mut self) -> Result<(), G::Error> {
        self.gpio.write_digital(self.clk, Level::High)?;
        self.gpio.write_digital(self.dio, Level::High)?;
        self.bit_delay();
        self.gpio.write_digital(self.dio, Level::Low)?;
        self.bit_delay();
        self.clock(Level::Low)
    }

    // DIO rises while CLK is high.
    fn stop(&mut self) -> Result<(), G::Error> {
        self.gpio.write_digital(self.clk, Level::Low)?;
        self.gpio.write_digital(self.dio, Level::Low)?;
        self.bit_delay();
        self.clock(Level::High)?;
        self.gpio.write_digital(self.dio, Level::High)?;
        self.bit_delay();
        Ok(())
    }

    /// Shifts out one byte LSB-first and runs the acknowledgment cycle.
    ///
    /// Returns whether the display acknowledged. A missing acknowledgment is
    /// counted and logged; the caller carries on regardless.
    fn write_byte(&mut self, byte: u8) -> Result<bool, G::Error> {
        let mut data = byte;
        for _ in 0..8 {
            self.gpio.write_digital(self.clk, Level::Low)?;
            self.gpio.write_digital(self.dio, Level::from(data & 0x01 != 0))?;
            self.bit_delay();
            self.clock(Level::High)?;
            data >>= 1;
        }

        // Release DIO and clock in the acknowledgment.
        self.gpio.write_digital(self.clk, Level::Low)?;
        self.gpio.write_digital(self.dio, Level::High)?;
        self.gpio.set_pin_mode(self.dio, PinMode::Input)?;
        self.bit_delay();
        self.clock(Level::High)?;

        let acked = self.gpio.read_digital(self.dio)?.is_low();
        if !acked {
            self.gpio.set_pin_mode(self.dio, PinMode::Output)?;
            self.gpio.write_digital(self.dio, Level::Low)?;
            self.missed_acks = self.missed_acks.wrapping_add(1);
            log::debug!("tm1637: no ack for byte {:#04x}", byte);
        }
        self.bit_delay();

        // CLK goes low before DIO is reclaimed so the release is not a STOP.
        self.gpio.write_digital(self.clk, Level::Low)?;
        self.gpio.set_pin_mode(self.dio, PinMode::Output)?;
        self.bit_delay();
        Ok(acked)
    }
}

impl<G: GpioPort> NumericDisplay for Tm1637<G> {
    type Error = G::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.begin()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        Tm1637::clear(self)
    }

    fn show_number(&mut self, value: i32, leading_zero: bool) -> Result<(), Self::Error> {
        self.render_number(value, leading_zero)
    }

    fn show_segments(&mut self, cells: &SegmentBuffer) -> Result<(), Self::Error> {
        self.render_digits(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{GpioEvent, MockGpio};
    use crate::segments::{digit_to_segments, OVERFLOW};

    const CLK: PinId = 6;
    const DIO: PinId = 7;

    fn driver() -> Tm1637<MockGpio> {
        let mut tm = Tm1637::new(MockGpio::new(CLK, DIO), CLK, DIO);
        tm.begin().unwrap();
        tm.gpio_mut().clear_events();
        tm
    }

    // =========================================================================
    // Brightness
    // =========================================================================

    #[test]
    fn default_brightness() {
        let tm = driver();
        assert_eq!(tm.brightness(), DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn brightness_clamps_to_seven() {
        let mut tm = driver();
        tm.set_brightness(3);
        assert_eq!(tm.brightness(), 3);
        tm.set_brightness(200);
        assert_eq!(tm.brightness(), 7);
    }

    #[test]
    fn brightness_sent_with_every_update() {
        let mut tm = driver();
        tm.set_brightness(2);
        tm.render_number(1, false).unwrap();
        tm.set_brightness(6);
        tm.render_number(1, false).unwrap();

        let frames = tm.gpio().frames();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[2].bytes, [0x8A]);
        assert_eq!(frames[5].bytes, [0x8E]);
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    #[test]
    fn begin_sets_outputs_and_idles_high() {
        let mut tm = Tm1637::new(MockGpio::new(CLK, DIO), CLK, DIO);
        tm.begin().unwrap();
        let events = &tm.gpio().events;
        assert!(events.contains(&GpioEvent::Mode(CLK, PinMode::Output)));
        assert!(events.contains(&GpioEvent::Mode(DIO, PinMode::Output)));
        assert_eq!(tm.gpio().level(CLK), Level::High);
        assert_eq!(tm.gpio().level(DIO), Level::High);
    }

    #[test]
    fn render_digits_three_transactions() {
        let mut tm = driver();
        tm.render_digits(&[0x01, 0x02, 0x04, 0x08]).unwrap();

        let frames = tm.gpio().frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].bytes, [CMD_AUTO_INCREMENT]);
        assert_eq!(frames[1].bytes, [CMD_START_ADDRESS, 0x01, 0x02, 0x04, 0x08]);
        assert_eq!(frames[2].bytes, [CMD_DISPLAY_ON | DEFAULT_BRIGHTNESS]);
        assert!(frames.iter().all(|f| f.stopped));
    }

    #[test]
    fn every_byte_has_nine_clock_pulses() {
        let mut tm = driver();
        tm.render_digits(&[0xFF, 0x00, 0xAA, 0x55]).unwrap();

        for frame in tm.gpio().frames() {
            // 8 data + 1 ack per byte, plus the rising edge inside STOP
            assert_eq!(frame.clock_pulses, frame.bytes.len() * 9 + 1);
            assert_eq!(frame.ack_reads, frame.bytes.len());
        }
    }

    #[test]
    fn render_cell_uses_fixed_address() {
        let mut tm = driver();
        tm.render_cell(2, 0x5B).unwrap();

        let frames = tm.gpio().frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].bytes, [CMD_FIXED_ADDRESS]);
        assert_eq!(frames[1].bytes, [CMD_START_ADDRESS + 2, 0x5B]);
    }

    #[test]
    fn render_cell_out_of_range_is_silent() {
        let mut tm = driver();
        tm.render_cell(4, 0x5B).unwrap();
        assert!(tm.gpio().events.is_empty());
    }

    #[test]
    fn clear_writes_blank_cells() {
        let mut tm = driver();
        tm.clear().unwrap();
        assert_eq!(tm.gpio().frames()[1].bytes, [CMD_START_ADDRESS, 0, 0, 0, 0]);
    }

    #[test]
    fn render_number_overflow() {
        let mut tm = driver();
        tm.render_number(12345, false).unwrap();
        let data = &tm.gpio().frames()[1].bytes;
        assert_eq!(&data[1..], &OVERFLOW);
    }

    #[test]
    fn render_number_leading_zero() {
        let mut tm = driver();
        tm.render_number(42, true).unwrap();
        let data = &tm.gpio().frames()[1].bytes;
        assert_eq!(
            &data[1..],
            &[
                digit_to_segments(0),
                digit_to_segments(0),
                digit_to_segments(4),
                digit_to_segments(2)
            ]
        );
    }

    // =========================================================================
    // Acknowledgment
    // =========================================================================

    #[test]
    fn acknowledged_bytes_are_not_counted() {
        let mut tm = driver();
        tm.render_number(7, false).unwrap();
        assert_eq!(tm.missed_acks(), 0);
    }

    #[test]
    fn missing_ack_is_counted_but_transaction_completes() {
        let mut tm = Tm1637::new(MockGpio::new(CLK, DIO).with_nack(), CLK, DIO);
        tm.begin().unwrap();
        tm.render_digits(&[1, 2, 3, 4]).unwrap();

        // 1 + 5 + 1 bytes
        assert_eq!(tm.missed_acks(), 7);
        let frames = tm.gpio().frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].bytes, [CMD_START_ADDRESS, 1, 2, 3, 4]);
    }

    #[test]
    fn missing_ack_forces_line_low() {
        let mut tm = Tm1637::new(MockGpio::new(CLK, DIO).with_nack(), CLK, DIO);
        tm.begin().unwrap();
        tm.gpio_mut().clear_events();
        tm.write_byte(0x00).unwrap();

        let events = &tm.gpio().events;
        let read_at = events
            .iter()
            .position(|e| matches!(e, GpioEvent::Read(DIO, _)))
            .unwrap();
        assert_eq!(events[read_at + 1], GpioEvent::Mode(DIO, PinMode::Output));
        assert_eq!(events[read_at + 2], GpioEvent::Write(DIO, Level::Low));
    }

    #[test]
    fn write_byte_reports_ack() {
        let mut tm = driver();
        assert!(tm.write_byte(0x12).unwrap());

        let mut tm = Tm1637::new(MockGpio::new(CLK, DIO).with_nack(), CLK, DIO);
        tm.begin().unwrap();
        assert!(!tm.write_byte(0x12).unwrap());
    }

    #[test]
    fn bit_delays_are_busy_waits() {
        let mut tm = driver();
        tm.render_number(0, false).unwrap();
        assert!(tm
            .gpio()
            .events
            .iter()
            .filter_map(|e| match e {
                GpioEvent::Wait(us) => Some(*us),
                _ => None,
            })
            .all(|us| us == BIT_DELAY_US));
        assert!(tm.gpio().total_wait_us() > 0);
    }

    // =========================================================================
    // NumericDisplay
    // =========================================================================

    #[test]
    fn numeric_display_impl_delegates() {
        let mut tm = Tm1637::new(MockGpio::new(CLK, DIO), CLK, DIO);
        NumericDisplay::init(&mut tm).unwrap();
        tm.show_number(-12, false).unwrap();
        NumericDisplay::clear(&mut tm).unwrap();

        let frames = tm.gpio().frames();
        assert_eq!(frames.len(), 6);
        assert_eq!(
            frames[1].bytes,
            [
                CMD_START_ADDRESS,
                0,
                crate::segments::MINUS,
                digit_to_segments(1),
                digit_to_segments(2)
            ]
        );
        assert_eq!(frames[4].bytes, [CMD_START_ADDRESS, 0, 0, 0, 0]);
    }

    #[test]
    fn from_config_applies_pins_and_brightness() {
        let config = DisplayConfig::default()
            .with_pins(3, 4)
            .with_brightness(9);
        let mut tm = Tm1637::from_config(MockGpio::new(3, 4), &config);
        tm.begin().unwrap();
        tm.render_number(1, false).unwrap();
        assert_eq!(tm.brightness(), 7);
        assert_eq!(tm.gpio().frames()[2].bytes, [0x8F]);
    }
}
