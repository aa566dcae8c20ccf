//! Firmware for a battery-powered eight-night menorah.
//!
//! # Overview
//!
//! This firmware controls a small menorah featuring:
//! - Sixteen lights on two 74HC595 shift chains, two lights per night
//! - A two-line helper (shamash) light, on while the menorah is awake
//! - A "next night" button, polled and debounced in firmware
//! - A reset button wired to NRST that restarts at night 0
//!
//! Each clean press lights the next night while keeping earlier nights lit.
//! The eighth press extinguishes everything and puts the STM32L031 into
//! Standby, where it stays until the reset button is pressed.
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+, ultra-low-power)
//! - **Shift chains**: 2x 74HC595 sharing clock, latch and OE_N
//! - **LEDs**: 16 night lights + 1 helper light
//! - **RTC**: 32.768 kHz crystal for the embassy time driver
//!
//! # Low Power Operation
//!
//! - MSI oscillator at 66 kHz for minimal active current
//! - Embassy executor sleeps between 100 ms button polls
//! - Standby after the last night, left only through NRST
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings and peripheral initialization
//! - `menorah` (library) - Shift chains, button, sequencer and power-down

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod hardware;

#[cfg(target_os = "none")]
use {
    embassy_executor::Spawner,
    embassy_stm32::{
        Config,
        rcc::{LsConfig, LseConfig, mux::ClockMux},
        time::Hertz,
    },
    embassy_time::{Duration, Ticker},
    hardware::Peripherals,
    menorah::{FirmwareConfig, Step},
};
#[cfg(target_os = "none")]
use {defmt_rtt as _, panic_probe as _};

/// Creates a low-power clock configuration for STM32L031.
///
/// # Clock Settings
///
/// - **MSI**: 66 kHz in normal mode, 2.097 MHz in debug mode (for reliable debugging)
/// - **System clock**: MSI (no PLL)
/// - **LSE**: 32.768 kHz external crystal for RTC
/// - **Voltage scale**: Range 1
///
/// Button polls and chain updates are rare and short, so the slowest MSI
/// range is plenty. In debug mode a faster clock keeps the debugger attached.
#[cfg(target_os = "none")]
fn create_low_power_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        #[cfg(feature = "debug-mode")]
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE2M),
        #[cfg(not(feature = "debug-mode"))]
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE66K),
        hsi: false,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::MSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz::hz(32768),
                mode: embassy_stm32::rcc::LseMode::Oscillator(embassy_stm32::rcc::LseDrive::Low),
            }),
        },
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Main entry point for the menorah firmware.
///
/// # Initialization Sequence
///
/// 1. Configure clocks for low power operation (66 kHz MSI)
/// 2. Initialize STM32 peripherals and bind the board pins
/// 3. Light the helper light and night 0
/// 4. Poll the button every 100 ms, advancing one night per clean press
///
/// After the last night the sequencer powers down into Standby and the
/// loop is never resumed; only NRST brings the firmware back here.
#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_low_power_config();

    let p = embassy_stm32::init(config);
    let core = cortex_m::Peripherals::take().unwrap();
    let firmware = FirmwareConfig::DEFAULT;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Menorah firmware starting...");

    // Wait 3 seconds after boot to allow debugger connection.
    #[cfg(feature = "debug-mode")]
    {
        defmt::info!("Waiting 3 seconds for debugger connection...");
        embassy_time::Timer::after_secs(3).await;
    }

    let mut peripherals = Peripherals::new(p, core, &firmware);

    let Ok(()) = peripherals.sequencer.start();

    #[cfg(feature = "debug-mode")]
    defmt::info!("Night 0 lit, polling every {} ms", firmware.poll_interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(firmware.poll_interval_ms));
    loop {
        ticker.next().await;

        let Ok(pressed) = peripherals.button.poll_for_clean_press();
        if !pressed {
            continue;
        }

        let Ok(step) = peripherals.sequencer.on_clean_press();
        match step {
            Step::Lit(_night) => {
                #[cfg(feature = "debug-mode")]
                defmt::info!("Night {} lit", _night.index());
            }
            Step::Halted | Step::Ignored => break,
        }
    }

    // Only reached when Standby is left by something other than NRST.
    #[cfg(feature = "debug-mode")]
    defmt::warn!("Woke from Standby without reset, parking");

    loop {
        cortex_m::asm::wfi();
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("menorah-rs is STM32L031 firmware, build it with --target thumbv6m-none-eabi");
}
