//! ESP32-C3 SuperMini hardware abstraction layer for the ADC meter.
//!
//! This module provides hardware implementations for an ESP32-C3 SuperMini
//! sampling one analog input and driving a TM1637 4-digit LED module.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Input**: ADC1 on GPIO4, 12-bit, 11 dB attenuation
//! - **Display**: TM1637 4-digit 7-segment module (two-wire)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod adc;
mod display;

pub use adc::Esp32AdcSampler;
pub use display::{new_display, Esp32Display, Esp32DisplayPort};

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    use crate::config::{DEFAULT_CLK_PIN, DEFAULT_DIO_PIN};
    use crate::traits::PinId;

    // =========================================================================
    // Analog Input
    // =========================================================================

    /// Sampled analog input (ADC1 channel 4)
    pub const AIN: PinId = 4;

    // =========================================================================
    // TM1637 Display
    // =========================================================================

    /// Display clock line
    pub const TM_CLK: PinId = DEFAULT_CLK_PIN;

    /// Display data line (open-drain, pulled up)
    pub const TM_DIO: PinId = DEFAULT_DIO_PIN;
}
