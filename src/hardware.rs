//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings for the menorah board and binds the
//! hardware-agnostic components to them.
//!
//! # Pin Assignments
//!
//! ## Shift Chains (2x 74HC595, lights 0-7 on chain A, 8-15 on chain B)
//! - **PB3**: SHIFT_CLK - Shared shift clock
//! - **PA15**: SHIFT_DATA_A - Serial data for chain A
//! - **PA7**: SHIFT_DATA_B - Serial data for chain B
//! - **PB0**: SHIFT_LATCH - Shared storage latch
//! - **PB5**: SHIFT_OE_N - Shared active-low output enable
//!
//! ## Helper Light
//! - **PA4**: SHAMASH_0 - Indicator line, bit 0
//! - **PA5**: SHAMASH_1 - Indicator line, bit 1
//!
//! ## Buttons
//! - **PB4**: NEXT_NIGHT - Momentary button to ground, internal pull-up
//! - **NRST**: Reset button, wired straight to the reset pin
//!
//! ## Low Power & RTC
//! - **PC14**: OSC32_IN - 32.768 kHz crystal input
//! - **PC15**: OSC32_OUT - 32.768 kHz crystal output
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_time::Delay;

use menorah::config::FirmwareConfig;
use menorah::power::Stm32l0Mcu;
use menorah::{DebouncedButton, DualChannelShiftDriver, IndicatorLight, NightSequencer};

/// Shift chains bound to their pins.
pub type Lights = DualChannelShiftDriver<
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Delay,
>;

/// Night sequencer bound to the board.
pub type Sequencer = NightSequencer<Lights, Output<'static>, Output<'static>, Stm32l0Mcu>;

/// Top-level peripheral container for the menorah.
pub struct Peripherals {
    /// Night state machine with the lights, helper light and power control
    pub sequencer: Sequencer,
    /// Next-night button
    pub button: DebouncedButton<Input<'static>>,
}

impl Peripherals {
    /// Initializes all peripherals from the STM32 peripheral singleton.
    ///
    /// # Initial GPIO States
    ///
    /// Shift chains:
    /// - PB3 (SHIFT_CLK), PA15/PA7 (SHIFT_DATA_A/B), PB0 (SHIFT_LATCH): Low
    /// - PB5 (SHIFT_OE_N): High (outputs blanked until night 0 is latched)
    ///
    /// Helper light:
    /// - PA4, PA5: Low (off)
    ///
    /// # Arguments
    ///
    /// * `p` - STM32 peripheral singleton from embassy_stm32::init()
    /// * `core` - Cortex-M core peripherals, the SCB drives deep sleep
    /// * `config` - Timing and indicator pattern
    pub fn new(
        p: embassy_stm32::Peripherals,
        core: cortex_m::Peripherals,
        config: &FirmwareConfig,
    ) -> Self {
        let mut lights = DualChannelShiftDriver::new(
            Output::new(p.PB3, Level::Low, Speed::Low),
            Output::new(p.PA15, Level::Low, Speed::Low),
            Output::new(p.PA7, Level::Low, Speed::Low),
            Output::new(p.PB0, Level::Low, Speed::Low),
            Output::new(p.PB5, Level::High, Speed::Low),
            Delay,
            config.shift,
        );
        let Ok(()) = lights.initialize();

        let indicator = IndicatorLight::new(
            Output::new(p.PA4, Level::Low, Speed::Low),
            Output::new(p.PA5, Level::Low, Speed::Low),
        );

        Self {
            sequencer: NightSequencer::new(
                lights,
                indicator,
                Stm32l0Mcu::new(core.SCB),
                config.indicator_on,
            ),
            button: DebouncedButton::new(Input::new(p.PB4, Pull::Up)),
        }
    }
}
