//! [`GpioPort`] adapter over embedded-hal 1.0 pins.
//!
//! Lets the TM1637 driver run on any HAL that implements the embedded-hal
//! digital and delay traits. The data pin must be open-drain (or otherwise
//! readable while driven high) so the display can pull it low to
//! acknowledge.
//!
//! # Example
//!
//! ```ignore
//! use adc_meter::hal::embedded::EmbeddedHalPort;
//! use adc_meter::tm1637::Tm1637;
//!
//! let port = EmbeddedHalPort::new(6, clk_pin, 7, dio_pin, delay);
//! let mut display = Tm1637::new(port, 6, 7);
//! display.begin()?;
//! display.render_number(42, false)?;
//! ```

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, InputPin, OutputPin, PinState};

use crate::traits::{GpioPort, Level, PinId, PinMode};

/// Error from [`EmbeddedHalPort`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpioError {
    /// The pin is neither the clock nor the data pin of this port.
    UnknownPin(PinId),
    /// The clock pin is output-only and cannot be read or released.
    OutputOnly(PinId),
    /// The underlying HAL reported an error.
    Digital(ErrorKind),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::UnknownPin(pin) => write!(f, "pin {} is not managed by this port", pin),
            GpioError::OutputOnly(pin) => write!(f, "pin {} is output-only", pin),
            GpioError::Digital(kind) => write!(f, "digital pin error: {:?}", kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GpioError {}

fn digital<E: embedded_hal::digital::Error>(e: E) -> GpioError {
    GpioError::Digital(e.kind())
}

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}

/// Two embedded-hal pins plus a delay, addressed by [`PinId`].
///
/// Releasing the data pin ([`PinMode::Input`]) drives it high, which on an
/// open-drain output lets the line float. Writes while released are latched
/// and applied when the pin becomes an output again.
pub struct EmbeddedHalPort<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    clk_id: PinId,
    dio_id: PinId,
    dio_released: bool,
    dio_latch: Level,
}

impl<CLK, DIO, D> EmbeddedHalPort<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: InputPin + OutputPin,
    D: DelayNs,
{
    /// Creates a port from a clock pin, an open-drain data pin and a delay.
    pub fn new(clk_id: PinId, clk: CLK, dio_id: PinId, dio: DIO, delay: D) -> Self {
        Self {
            clk,
            dio,
            delay,
            clk_id,
            dio_id,
            dio_released: false,
            dio_latch: Level::High,
        }
    }

    /// Returns the pins and delay.
    pub fn release(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }
}

impl<CLK, DIO, D> GpioPort for EmbeddedHalPort<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: InputPin + OutputPin,
    D: DelayNs,
{
    type Error = GpioError;

    fn set_pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), GpioError> {
        if pin == self.dio_id {
            self.dio_released = mode == PinMode::Input;
            let state = if self.dio_released {
                PinState::High
            } else {
                self.dio_latch.into()
            };
            self.dio.set_state(state).map_err(digital)
        } else if pin == self.clk_id {
            match mode {
                PinMode::Output => Ok(()),
                PinMode::Input => Err(GpioError::OutputOnly(pin)),
            }
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), GpioError> {
        if pin == self.clk_id {
            self.clk.set_state(level.into()).map_err(digital)
        } else if pin == self.dio_id {
            self.dio_latch = level;
            if self.dio_released {
                return Ok(());
            }
            self.dio.set_state(level.into()).map_err(digital)
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }

    fn read_digital(&mut self, pin: PinId) -> Result<Level, GpioError> {
        if pin == self.dio_id {
            self.dio.is_high().map(Level::from).map_err(digital)
        } else if pin == self.clk_id {
            Err(GpioError::OutputOnly(pin))
        } else {
            Err(GpioError::UnknownPin(pin))
        }
    }

    fn busy_wait_micros(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakePin {
        state: Rc<Cell<bool>>,
        // Display holding the line low.
        pulled_low: Rc<Cell<bool>>,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.state.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.state.set(true);
            Ok(())
        }
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.state.get() && !self.pulled_low.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        total_us: Rc<Cell<u64>>,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us.set(self.total_us.get() + u64::from(ns) / 1000);
        }
    }

    fn port() -> (EmbeddedHalPort<FakePin, FakePin, FakeDelay>, FakePin, FakePin) {
        let clk = FakePin::default();
        let dio = FakePin::default();
        let port = EmbeddedHalPort::new(6, clk.clone(), 7, dio.clone(), FakeDelay::default());
        (port, clk, dio)
    }

    #[test]
    fn writes_reach_pins() {
        let (mut port, clk, dio) = port();
        port.write_digital(6, Level::High).unwrap();
        port.write_digital(7, Level::Low).unwrap();
        assert!(clk.state.get());
        assert!(!dio.state.get());
    }

    #[test]
    fn released_dio_latches_writes() {
        let (mut port, _clk, dio) = port();
        port.set_pin_mode(7, PinMode::Input).unwrap();
        assert!(dio.state.get());

        port.write_digital(7, Level::Low).unwrap();
        assert!(dio.state.get());

        port.set_pin_mode(7, PinMode::Output).unwrap();
        assert!(!dio.state.get());
    }

    #[test]
    fn reads_device_ack() {
        let (mut port, _clk, dio) = port();
        port.set_pin_mode(7, PinMode::Input).unwrap();
        assert_eq!(port.read_digital(7).unwrap(), Level::High);

        dio.pulled_low.set(true);
        assert_eq!(port.read_digital(7).unwrap(), Level::Low);
    }

    #[test]
    fn unknown_and_output_only_pins() {
        let (mut port, _clk, _dio) = port();
        assert_eq!(
            port.write_digital(9, Level::High),
            Err(GpioError::UnknownPin(9))
        );
        assert_eq!(port.read_digital(6), Err(GpioError::OutputOnly(6)));
        assert_eq!(
            port.set_pin_mode(6, PinMode::Input),
            Err(GpioError::OutputOnly(6))
        );
        assert!(port.set_pin_mode(6, PinMode::Output).is_ok());
    }

    #[test]
    fn busy_wait_uses_delay() {
        let clk = FakePin::default();
        let dio = FakePin::default();
        let delay = FakeDelay::default();
        let total = delay.total_us.clone();
        let mut port = EmbeddedHalPort::new(6, clk, 7, dio, delay);
        port.busy_wait_micros(50);
        assert!(total.get() >= 50);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            GpioError::UnknownPin(3).to_string(),
            "pin 3 is not managed by this port"
        );
    }
}
