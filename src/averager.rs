//! Streaming moving average over the ADC conversion stream.
//!
//! [`SampleAverager`] is fed from the conversion-complete interrupt and keeps
//! the mean of the most recent [`WINDOW_SIZE`] readings. The mean is
//! published through a [`PublishedAverage`], which the main loop reads
//! without locking.
//!
//! # Overview
//!
//! - [`SampleWindow`]: ring buffer with an incrementally maintained sum, so
//!   each new sample costs O(1) regardless of window size
//! - [`PublishedAverage`]: one atomic word holding the latest mean
//! - [`SampleAverager`]: window + output handle, implements [`SampleSink`]
//!
//! While fewer than `N` samples have arrived, the mean divides by the number
//! seen so far rather than by `N`.
//!
//! # Example
//!
//! ```rust
//! use adc_meter::averager::{PublishedAverage, SampleAverager};
//! use adc_meter::traits::SampleSink;
//!
//! static AVERAGE: PublishedAverage = PublishedAverage::new();
//!
//! // Owned by the interrupt handler
//! let mut averager: SampleAverager<'_> = SampleAverager::new(&AVERAGE);
//! averager.on_sample(100);
//! averager.on_sample(200);
//!
//! // Read from the main loop
//! assert_eq!(AVERAGE.current_average(), 150);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use crate::traits::SampleSink;

/// Number of samples in the averaging window.
pub const WINDOW_SIZE: usize = 32;

/// Fixed-capacity ring buffer of the most recent raw readings.
///
/// The running sum always equals the sum of the populated slots. The sum is
/// a `u32`, which holds any window of `u16` readings up to 65537 slots.
#[derive(Clone, Debug)]
pub struct SampleWindow<const N: usize = WINDOW_SIZE> {
    samples: [u16; N],
    sum: u32,
    cursor: usize,
    populated: usize,
}

impl<const N: usize> SampleWindow<N> {
    /// Creates an empty window.
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            sum: 0,
            cursor: 0,
            populated: 0,
        }
    }

    /// Inserts a reading, evicting the oldest one once the window is full.
    pub fn push(&mut self, raw: u16) {
        if self.populated == N {
            self.sum -= u32::from(self.samples[self.cursor]);
        } else {
            self.populated += 1;
        }
        self.samples[self.cursor] = raw;
        self.sum += u32::from(raw);
        self.cursor = (self.cursor + 1) % N;
    }

    /// Mean of the populated slots, truncated. Zero while empty.
    pub fn mean(&self) -> u32 {
        if self.populated == 0 {
            0
        } else {
            self.sum / self.populated as u32
        }
    }

    /// Sum of the populated slots.
    #[inline]
    pub fn sum(&self) -> u32 {
        self.sum
    }

    /// Number of populated slots, at most `N`.
    #[inline]
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` before the first reading.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns `true` once `N` readings have arrived.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.populated == N
    }

    /// Window capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drops all readings.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest average, shared between the sampling interrupt and the main loop.
///
/// Stored as a single word, so a reader always sees a complete value from
/// before or after an update. Place it in a `static` so both contexts can
/// reach it.
#[derive(Debug, Default)]
pub struct PublishedAverage(AtomicU32);

impl PublishedAverage {
    /// Creates a published average of zero.
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Returns the most recently published average.
    ///
    /// Never blocks. Zero before the first sample.
    #[inline]
    pub fn current_average(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    fn publish(&self, value: u32) {
        self.0.store(value, Ordering::Release);
    }
}

/// Windowed mean of the ADC stream.
///
/// Owned by the sample source (usually the ADC interrupt handler). Every
/// call to [`on_sample`](SampleSink::on_sample) updates the window and then
/// publishes the new mean with one atomic store.
///
/// # Type Parameter
///
/// - `N`: window size, defaults to [`WINDOW_SIZE`]
#[derive(Debug)]
pub struct SampleAverager<'a, const N: usize = WINDOW_SIZE> {
    window: SampleWindow<N>,
    output: &'a PublishedAverage,
}

impl<'a, const N: usize> SampleAverager<'a, N> {
    /// Creates an averager with an empty window publishing into `output`.
    pub const fn new(output: &'a PublishedAverage) -> Self {
        Self {
            window: SampleWindow::new(),
            output,
        }
    }

    /// Returns the current average (same value the main loop reads).
    #[inline]
    pub fn current_average(&self) -> u32 {
        self.output.current_average()
    }

    /// Read-only view of the sample window.
    pub fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    /// Empties the window and publishes zero.
    pub fn reset(&mut self) {
        self.window.clear();
        self.output.publish(0);
    }
}

impl<const N: usize> SampleSink for SampleAverager<'_, N> {
    fn on_sample(&mut self, raw: u16) {
        self.window.push(raw);
        self.output.publish(self.window.mean());
    }
}
