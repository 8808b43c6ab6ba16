//! Continuous ADC sampling on ESP32.
//!
//! The ESP32-C3 oneshot driver has no conversion-complete interrupt hook in
//! esp-idf-hal, so the firmware runs this sampler on its own thread and
//! calls [`poll`](Esp32AdcSampler::poll) at a fixed cadence. Each reading is
//! handed to a [`SampleSink`], which is exactly what an interrupt handler
//! would do.
//!
//! # Wiring
//!
//! - Analog input → GPIO4 (ADC1 channel 4)

use crate::traits::SampleSink;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::Gpio4;
use esp_idf_hal::peripheral::Peripheral;

/// ADC1 sampler on GPIO4.
///
/// # Example
///
/// ```ignore
/// use adc_meter::averager::{PublishedAverage, SampleAverager};
/// use adc_meter::hal::esp32::Esp32AdcSampler;
///
/// static AVERAGE: PublishedAverage = PublishedAverage::new();
///
/// let adc = AdcDriver::new(peripherals.adc1)?;
/// let mut sampler = Esp32AdcSampler::new(&adc, peripherals.pins.gpio4)?;
/// let mut averager: SampleAverager<'static> = SampleAverager::new(&AVERAGE);
///
/// loop {
///     sampler.poll(&mut averager)?;
/// }
/// ```
pub struct Esp32AdcSampler<'d> {
    /// Analog input channel (GPIO4)
    channel: AdcChannelDriver<'d, Gpio4, &'d AdcDriver<'d, ADC1>>,
    /// Number of readings delivered
    delivered: u64,
}

impl<'d> Esp32AdcSampler<'d> {
    /// Creates a sampler with 11 dB attenuation (full 0-3.3V range, 12-bit).
    ///
    /// # Errors
    ///
    /// Returns an error if ADC channel initialization fails.
    pub fn new(
        adc: &'d AdcDriver<'d, ADC1>,
        pin: impl Peripheral<P = Gpio4> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;

        Ok(Self {
            channel,
            delivered: 0,
        })
    }

    /// Takes one raw reading and hands it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the conversion error; nothing is delivered in that case.
    pub fn poll<S: SampleSink>(&mut self, sink: &mut S) -> Result<u16, esp_idf_hal::sys::EspError> {
        let raw = self.channel.read_raw()?;
        sink.on_sample(raw);
        self.delivered += 1;
        Ok(raw)
    }

    /// Number of readings delivered so far.
    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}
