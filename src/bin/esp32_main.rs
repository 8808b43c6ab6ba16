//! ESP32-C3 SuperMini ADC meter.
//!
//! This is the main entry point for the physical meter. It runs two loops:
//! - A sampler thread feeding every ADC reading into the moving average
//! - The main loop refreshing the TM1637 display every 50ms
//!
//! The two share nothing but the published average.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use adc_meter::hal::esp32::{new_display, pins, Esp32AdcSampler};
use adc_meter::{Meter, MeterConfig, PublishedAverage, SampleAverager, REFRESH_INTERVAL_MS};
use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{Gpio4, IOPin};
use esp_idf_hal::peripherals::Peripherals;
use std::thread;
use std::time::Duration;

/// Pause between ADC readings in the sampler thread.
const SAMPLE_INTERVAL_MS: u32 = 1;

/// Sampler thread stack size in bytes.
const SAMPLER_STACK_SIZE: usize = 4096;

/// Latest average, written by the sampler thread, read by the main loop.
static AVERAGE: PublishedAverage = PublishedAverage::new();

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("adc-meter starting");

    let config = MeterConfig::default();
    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Start the sample source (ADC1 on GPIO4)
    // =========================================================================
    let adc1 = peripherals.adc1;
    let ain = peripherals.pins.gpio4;
    thread::Builder::new()
        .stack_size(SAMPLER_STACK_SIZE)
        .spawn(move || {
            if let Err(e) = run_sampler(adc1, ain) {
                log::error!("sampler stopped: {:?}", e);
            }
        })?;
    log::info!("sampler started (GPIO{} ADC)", pins::AIN);

    // =========================================================================
    // Initialize Display (TM1637 on GPIO6/7)
    // =========================================================================
    let display = new_display(
        peripherals.pins.gpio6.downgrade(),
        peripherals.pins.gpio7.downgrade(),
        &config.display,
    )?;
    let mut meter = Meter::new(display, config.display.leading_zero);
    meter.start()?;
    log::info!(
        "display initialized (GPIO{}/{} TM1637)",
        pins::TM_CLK,
        pins::TM_DIO
    );

    // =========================================================================
    // Main Refresh Loop (20Hz)
    // =========================================================================
    let mut reported_acks = 0;
    loop {
        if let Err(e) = meter.refresh(&AVERAGE) {
            log::warn!("display refresh failed: {}", e);
        }

        let missed = meter.display().missed_acks();
        if missed != reported_acks {
            log::warn!("display missed {} acknowledgments", missed - reported_acks);
            reported_acks = missed;
        }

        thread::sleep(Duration::from_millis(u64::from(REFRESH_INTERVAL_MS)));
    }
}

fn run_sampler(adc1: ADC1, ain: Gpio4) -> anyhow::Result<()> {
    let adc = AdcDriver::new(adc1)?;
    let mut sampler = Esp32AdcSampler::new(&adc, ain)?;
    let mut averager: SampleAverager<'static> = SampleAverager::new(&AVERAGE);

    loop {
        if let Err(e) = sampler.poll(&mut averager) {
            log::warn!("ADC read failed: {:?}", e);
        }
        FreeRtos::delay_ms(SAMPLE_INTERVAL_MS);
    }
}
