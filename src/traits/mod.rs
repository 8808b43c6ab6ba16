//! Trait definitions for hardware abstraction and display output.
//!
//! This module defines the core abstractions that allow adc-meter to:
//! - Run on different hardware (ESP32, any embedded-hal board, desktop mock)
//! - Feed the averager from any sample source
//! - Drive the refresh loop against any numeric display
//!
//! # Submodules
//!
//! - `hardware`: GPIO port, pin levels and modes, sample sink
//! - `display`: Numeric display trait
//!
//! # Hardware Abstraction
//!
//! - [`GpioPort`]: Pin-addressed GPIO with busy-wait delays
//! - [`SampleSink`]: Per-conversion callback target
//! - [`NumericDisplay`]: 4-cell decimal readout

pub mod display;
pub mod hardware;

pub use display::*;
pub use hardware::*;
