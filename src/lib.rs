//! # adc-meter
//!
//! A minimal meter firmware core: it averages a continuous ADC stream over
//! the last 32 samples and shows the result on a TM1637 4-digit
//! 7-segment LED module.
//!
//! ## Features
//!
//! - **Streaming average**: O(1) ring-buffer mean, safe to feed from an interrupt
//! - **Lock-free handoff**: the average is published as one atomic word
//! - **TM1637 driver**: bit-banged two-wire protocol with acknowledgment check
//! - **Number encoding**: sign, leading-zero policy and overflow glyphs
//! - **Hardware abstraction**: pin-addressed GPIO trait with mock and embedded-hal backends
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - GPIO, sample sink and display abstractions
//! - `averager` - Windowed mean over the conversion stream
//! - `segments` - 7-segment glyph table and number encoding
//! - `tm1637` - Display protocol driver
//! - `meter` - Main-loop refresh step tying the two together
//! - `hal` - Concrete implementations (mock for testing, embedded-hal, esp32)
//!
//! ## Example
//!
//! ```rust
//! use adc_meter::{
//!     Meter, PublishedAverage, SampleAverager, Tm1637,
//!     hal::MockGpio,
//!     traits::SampleSink,
//! };
//!
//! static AVERAGE: PublishedAverage = PublishedAverage::new();
//!
//! // Interrupt side: one call per completed conversion
//! let mut averager: SampleAverager<'_> = SampleAverager::new(&AVERAGE);
//! averager.on_samples(&[2040, 2050, 2060]);
//!
//! // Main loop side: refresh every 50ms
//! let display = Tm1637::new(MockGpio::new(6, 7), 6, 7);
//! let mut meter = Meter::new(display, false);
//! meter.start().unwrap();
//! assert_eq!(meter.refresh(&AVERAGE).unwrap(), 2050);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Windowed moving average over the ADC stream.
pub mod averager;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Main-loop refresh step.
pub mod meter;
/// 7-segment glyphs and number encoding.
pub mod segments;
/// TM1637 two-wire display driver.
pub mod tm1637;
/// Core traits for hardware abstraction.
pub mod traits;

/// Board configuration.
pub mod config;

// Re-exports for convenience
pub use averager::{PublishedAverage, SampleAverager, SampleWindow, WINDOW_SIZE};
pub use meter::{Meter, REFRESH_INTERVAL_MS};
pub use segments::{digit_to_segments, encode_number, SegmentBuffer};
pub use tm1637::Tm1637;
pub use traits::{GpioPort, Level, NumericDisplay, PinId, PinMode, SampleSink};

// Config re-exports
pub use config::{DisplayConfig, MeterConfig};
