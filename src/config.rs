//! Board configuration for the meter.
//!
//! Only the display wiring, brightness and leading-zero policy are
//! configurable. Window size, bit timing and refresh cadence are constants
//! ([`WINDOW_SIZE`](crate::averager::WINDOW_SIZE),
//! [`BIT_DELAY_US`](crate::tm1637::BIT_DELAY_US),
//! [`REFRESH_INTERVAL_MS`](crate::meter::REFRESH_INTERVAL_MS)).
//!
//! # Example
//!
//! ```rust
//! use adc_meter::config::{DisplayConfig, MeterConfig};
//!
//! // Use defaults
//! let config = MeterConfig::default();
//! assert_eq!(config.display.brightness, 4);
//!
//! // Or customize
//! let config = MeterConfig::default().with_display(
//!     DisplayConfig::default()
//!         .with_pins(2, 1)
//!         .with_brightness(7)
//!         .with_leading_zero(true),
//! );
//! assert_eq!(config.display.clk_pin, 2);
//! ```

use crate::tm1637::{DEFAULT_BRIGHTNESS, MAX_BRIGHTNESS};
use crate::traits::PinId;

/// Default TM1637 clock pin.
pub const DEFAULT_CLK_PIN: PinId = 6;

/// Default TM1637 data pin.
pub const DEFAULT_DIO_PIN: PinId = 7;

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterConfig {
    /// Display wiring and appearance
    pub display: DisplayConfig,
}

impl MeterConfig {
    /// Set display configuration
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }
}

// ============================================================================
// Display Config
// ============================================================================

/// TM1637 display configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Clock line pin
    pub clk_pin: PinId,
    /// Data line pin
    pub dio_pin: PinId,
    /// Brightness level (0-7)
    pub brightness: u8,
    /// Fill unused cells with zeros instead of blanks
    pub leading_zero: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            clk_pin: DEFAULT_CLK_PIN,
            dio_pin: DEFAULT_DIO_PIN,
            brightness: DEFAULT_BRIGHTNESS,
            leading_zero: false,
        }
    }
}

impl DisplayConfig {
    /// Set clock and data pins
    pub fn with_pins(mut self, clk_pin: PinId, dio_pin: PinId) -> Self {
        self.clk_pin = clk_pin;
        self.dio_pin = dio_pin;
        self
    }

    /// Set brightness (clamped to 0-7)
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness.min(MAX_BRIGHTNESS);
        self
    }

    /// Enable or disable leading zeros
    pub fn with_leading_zero(mut self, leading_zero: bool) -> Self {
        self.leading_zero = leading_zero;
        self
    }
}
