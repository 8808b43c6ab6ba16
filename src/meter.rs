//! Cooperative refresh loop that shows the running average.
//!
//! [`Meter`] is the main-loop half of the system. Each
//! [`refresh`](Meter::refresh) reads the [`PublishedAverage`] once and writes
//! it to the display. The firmware calls it every [`REFRESH_INTERVAL_MS`];
//! a missed or unacknowledged update is simply overwritten by the next one.
//!
//! # Example
//!
//! ```rust
//! use adc_meter::averager::{PublishedAverage, SampleAverager};
//! use adc_meter::hal::MockDisplay;
//! use adc_meter::meter::Meter;
//! use adc_meter::traits::SampleSink;
//!
//! static AVERAGE: PublishedAverage = PublishedAverage::new();
//!
//! let mut averager: SampleAverager<'_> = SampleAverager::new(&AVERAGE);
//! let mut meter = Meter::new(MockDisplay::new(), false);
//! meter.start().unwrap();
//!
//! averager.on_samples(&[1000, 2000]);
//! assert_eq!(meter.refresh(&AVERAGE).unwrap(), 1500);
//! assert_eq!(meter.display().last_shown(), Some(1500));
//! ```

use crate::averager::PublishedAverage;
use crate::traits::NumericDisplay;

/// Display refresh period of the main loop in milliseconds.
pub const REFRESH_INTERVAL_MS: u32 = 50;

/// Reads the published average and renders it.
///
/// # Type Parameter
///
/// - `D`: The display implementation ([`NumericDisplay`] trait)
pub struct Meter<D: NumericDisplay> {
    display: D,
    leading_zero: bool,
    last_value: Option<i32>,
}

impl<D: NumericDisplay> Meter<D> {
    /// Create a meter writing to `display`
    pub fn new(display: D, leading_zero: bool) -> Self {
        Self {
            display,
            leading_zero,
            last_value: None,
        }
    }

    /// Initialize and blank the display
    pub fn start(&mut self) -> Result<(), D::Error> {
        self.display.init()?;
        self.display.clear()?;
        self.last_value = None;
        log::info!("meter started");
        Ok(())
    }

    /// Show the current average and return the value shown.
    ///
    /// Averages beyond `i32::MAX` are shown as the overflow glyphs.
    pub fn refresh(&mut self, average: &PublishedAverage) -> Result<i32, D::Error> {
        let value = i32::try_from(average.current_average()).unwrap_or(i32::MAX);
        self.display.show_number(value, self.leading_zero)?;

        if self.last_value != Some(value) {
            log::trace!("meter: {:?} -> {}", self.last_value, value);
            self.last_value = Some(value);
        }
        Ok(value)
    }

    /// Value written by the most recent refresh
    pub fn last_value(&self) -> Option<i32> {
        self.last_value
    }

    /// Access the display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display (e.g. to change brightness)
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Consume the meter and return the display
    pub fn into_display(self) -> D {
        self.display
    }
}
