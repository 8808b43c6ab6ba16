//! TM1637 display on ESP32 GPIO.
//!
//! CLK is a push-pull output, DIO is open-drain with the internal pull-up
//! enabled so the display can pull it low to acknowledge. Bit timing uses
//! the ROM busy-wait ([`Ets`]).
//!
//! # Wiring
//!
//! - CLK → GPIO6
//! - DIO → GPIO7
//! - VCC → 3.3V
//! - GND → GND

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, InputOutput, Output, PinDriver, Pull};
use esp_idf_hal::sys::EspError;

use crate::config::DisplayConfig;
use crate::hal::embedded::EmbeddedHalPort;
use crate::tm1637::Tm1637;

/// GPIO port for the display lines.
pub type Esp32DisplayPort<'d> =
    EmbeddedHalPort<PinDriver<'d, AnyIOPin, Output>, PinDriver<'d, AnyIOPin, InputOutput>, Ets>;

/// TM1637 driver bound to ESP32 pins.
pub type Esp32Display<'d> = Tm1637<Esp32DisplayPort<'d>>;

/// Creates the display driver from two downgraded pins.
///
/// The pin numbers in `config` must match the pins passed in; they are the
/// identifiers the driver uses to address each line.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::gpio::IOPin;
/// use adc_meter::hal::esp32::new_display;
/// use adc_meter::config::DisplayConfig;
///
/// let peripherals = Peripherals::take()?;
/// let mut display = new_display(
///     peripherals.pins.gpio6.downgrade(),
///     peripherals.pins.gpio7.downgrade(),
///     &DisplayConfig::default(),
/// )?;
/// display.begin()?;
/// ```
///
/// # Errors
///
/// Returns an error if either pin cannot be configured.
pub fn new_display<'d>(
    clk: AnyIOPin,
    dio: AnyIOPin,
    config: &DisplayConfig,
) -> Result<Esp32Display<'d>, EspError> {
    let clk = PinDriver::output(clk)?;
    let mut dio = PinDriver::input_output_od(dio)?;
    dio.set_pull(Pull::Up)?;

    let port = EmbeddedHalPort::new(config.clk_pin, clk, config.dio_pin, dio, Ets);
    Ok(Tm1637::from_config(port, config))
}
