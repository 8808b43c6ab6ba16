//! Display abstraction for the numeric readout.
//!
//! This module defines the [`NumericDisplay`] trait used by the refresh
//! loop in [`crate::meter`]. The TM1637 driver implements it for real
//! hardware and [`crate::hal::MockDisplay`] implements it for tests.

use crate::segments::SegmentBuffer;

/// Display trait for a 4-cell numeric readout.
///
/// # Example
///
/// ```ignore
/// use adc_meter::traits::NumericDisplay;
/// use adc_meter::segments::SegmentBuffer;
///
/// struct MyDisplay { /* ... */ }
///
/// impl NumericDisplay for MyDisplay {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn show_number(&mut self, value: i32, leading_zero: bool) -> Result<(), ()> {
///         Ok(())
///     }
///     fn show_segments(&mut self, cells: &SegmentBuffer) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait NumericDisplay {
    /// Error type for display operations.
    type Error;

    /// Initializes the display hardware.
    ///
    /// Called once at startup, before any other method.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Blanks all four cells.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Shows a signed decimal value.
    ///
    /// Values outside `-999..=9999` show the overflow glyphs instead.
    fn show_number(&mut self, value: i32, leading_zero: bool) -> Result<(), Self::Error>;

    /// Shows four raw segment bitmaps, cell 0 leftmost.
    fn show_segments(&mut self, cells: &SegmentBuffer) -> Result<(), Self::Error>;
}
