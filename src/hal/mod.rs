//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development (requires `std` feature)
//! - `embedded`: Adapter over embedded-hal 1.0 pins (requires `embedded-hal` feature)
//! - `esp32`: ESP32-C3 SuperMini with a TM1637 module (requires `esp32` feature)

#[cfg(feature = "std")]
pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

#[cfg(feature = "esp32")]
pub mod esp32;

#[cfg(feature = "std")]
pub use mock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
