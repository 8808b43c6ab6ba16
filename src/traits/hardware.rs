//! Hardware abstraction traits for GPIO access and sample delivery.
//!
//! This module defines the hardware interfaces that let adc-meter run on
//! different platforms (ESP32, any embedded-hal board, desktop mocks).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`GpioPort`] | Pin direction, pin level and busy-wait delays |
//! | [`SampleSink`] | Receives one raw ADC reading per completed conversion |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For real pins, use the embedded-hal adapter
//! in `hal::embedded` (requires `embedded-hal` feature) or the ESP32
//! helpers in `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use adc_meter::traits::{GpioPort, Level, PinMode};
//! use adc_meter::hal::MockGpio;
//!
//! let mut gpio = MockGpio::new(6, 7);
//! gpio.set_pin_mode(6, PinMode::Output).unwrap();
//! gpio.write_digital(6, Level::Low).unwrap();
//!
//! assert_eq!(gpio.level(6), Level::Low);
//! ```

/// Identifier of a GPIO pin as numbered by the board.
pub type PinId = u8;

/// Logic level of a digital pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Pin driven or read low.
    Low,
    /// Pin driven or read high.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Returns `true` for [`Level::Low`].
    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Direction of a GPIO pin.
///
/// On an open-drain line, [`Input`](Self::Input) means "released": the pin
/// stops pulling low and the pull-up (or the remote device) sets the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// Pin is read, not driven.
    Input,
    /// Pin is driven by the controller.
    Output,
}

/// GPIO collaborator used by the display driver.
///
/// Pins are addressed by [`PinId`], so one implementation can serve any
/// pair of pins chosen at construction time. All delays are busy-waits;
/// nothing here yields to a scheduler.
///
/// # Implementation Notes
///
/// - `write_digital` on a pin in [`PinMode::Input`] only updates the output
///   latch; the level appears on the line once the pin is an output again.
/// - `busy_wait_micros` must not sleep the calling thread.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use adc_meter::traits::{GpioPort, Level, PinId, PinMode};
///
/// struct MyPort { /* register handles */ }
///
/// impl GpioPort for MyPort {
///     type Error = core::convert::Infallible;
///
///     fn set_pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
///         // Write the direction register...
///         Ok(())
///     }
///
///     fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
///         // Write the output register...
///         Ok(())
///     }
///
///     fn read_digital(&mut self, pin: PinId) -> Result<Level, Self::Error> {
///         Ok(Level::High)
///     }
///
///     fn busy_wait_micros(&mut self, us: u32) {
///         // Spin on a cycle counter...
///     }
/// }
/// ```
pub trait GpioPort {
    /// Error type for pin operations.
    type Error;

    /// Switches a pin between input and output.
    fn set_pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error>;

    /// Drives a pin to the given level.
    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error>;

    /// Reads the current level of a pin.
    fn read_digital(&mut self, pin: PinId) -> Result<Level, Self::Error>;

    /// Spins for at least `us` microseconds.
    fn busy_wait_micros(&mut self, us: u32);
}

/// Receiver of raw ADC conversion results.
///
/// The sample source calls [`on_sample`](Self::on_sample) once per completed
/// conversion, typically from the ADC interrupt. Implementations must run in
/// bounded time and must not block.
pub trait SampleSink {
    /// Accepts one raw conversion result.
    fn on_sample(&mut self, raw: u16);

    /// Accepts a batch of results in arrival order.
    fn on_samples(&mut self, raws: &[u16]) {
        for &raw in raws {
            self.on_sample(raw);
        }
    }
}
