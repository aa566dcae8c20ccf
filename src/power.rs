//! Power-down sequence for the end of the last night.
//!
//! After the eighth press the menorah extinguishes everything and parks the
//! MCU in its deepest sleep mode. On the STM32L031 that is Standby, which is
//! only left through NRST; the reset button is wired there, so a press of
//! that button restarts the firmware at night 0.
//!
//! # Sequence
//!
//! 1. Indicator off
//! 2. Blank frame shifted out, then outputs disabled
//! 3. ADC disabled
//! 4. Deepest sleep mode selected
//! 5. Interrupts disabled
//! 6. Sleep armed
//! 7. Timer and miscellaneous peripheral clocks gated
//! 8. Sleep entered (execution stops here)
//! 9. Sleep disarmed, only reached on a wake-up other than reset

use embedded_hal::digital::v2::OutputPin;

use crate::config::INDICATOR_OFF;
use crate::indicator::IndicatorLight;
use crate::sequencer::ShiftFrame;
use crate::shift_driver::FrameOutput;

/// MCU-level steps of the power-down sequence.
///
/// Each method is one unconditional register write (or instruction); none
/// of them can fail.
pub trait LowPowerMcu {
    /// Turns off the analog sampling peripheral.
    fn disable_adc(&mut self);
    /// Selects the lowest-power sleep mode for the next sleep.
    fn select_deepest_sleep(&mut self);
    /// Masks all interrupts so nothing runs between arming and sleeping.
    fn disable_interrupts(&mut self);
    /// Makes the next sleep instruction enter the selected deep mode.
    fn arm_sleep(&mut self);
    /// Stops the clocks of timers and other peripherals unused while halted.
    fn gate_peripheral_clocks(&mut self);
    /// Enters sleep. Does not return on real hardware.
    fn sleep(&mut self);
    /// Clears the deep-sleep request after an unexpected wake-up.
    fn disarm_sleep(&mut self);
}

/// Runs the full power-down sequence once, in order.
pub fn power_down<D, P0, P1, M, E>(
    lights: &mut D,
    indicator: &mut IndicatorLight<P0, P1>,
    mcu: &mut M,
) -> Result<(), E>
where
    D: FrameOutput<Error = E>,
    P0: OutputPin<Error = E>,
    P1: OutputPin<Error = E>,
    M: LowPowerMcu,
{
    indicator.set(INDICATOR_OFF)?;
    lights.show(ShiftFrame::BLANK)?;
    lights.set_output_enabled(false)?;

    mcu.disable_adc();
    mcu.select_deepest_sleep();
    mcu.disable_interrupts();
    mcu.arm_sleep();
    mcu.gate_peripheral_clocks();
    mcu.sleep();
    mcu.disarm_sleep();
    Ok(())
}

#[cfg(target_os = "none")]
pub use stm32l0::Stm32l0Mcu;

#[cfg(target_os = "none")]
mod stm32l0 {
    use cortex_m::peripheral::SCB;
    use embassy_stm32::pac;

    use super::LowPowerMcu;

    /// STM32L0 Standby control through the PAC and the Cortex-M SCB.
    pub struct Stm32l0Mcu {
        scb: SCB,
    }

    impl Stm32l0Mcu {
        /// Creates the Standby controller.
        ///
        /// # Arguments
        ///
        /// * `scb` - System control block, used for the SLEEPDEEP bit
        pub fn new(scb: SCB) -> Self {
            Self { scb }
        }
    }

    impl LowPowerMcu for Stm32l0Mcu {
        fn disable_adc(&mut self) {
            // ADC registers are only accessible with the ADC clock running
            if pac::RCC.apb2enr().read().adcen() && pac::ADC1.cr().read().aden() {
                pac::ADC1.cr().modify(|w| w.set_addis(true));
                while pac::ADC1.cr().read().aden() {}
            }
        }

        fn select_deepest_sleep(&mut self) {
            pac::RCC.apb1enr().modify(|w| w.set_pwren(true));
            pac::PWR.cr().modify(|w| {
                w.set_pdds(pac::pwr::vals::Pdds::STANDBY_MODE);
                // Vrefint off in low-power modes
                w.set_ulp(true);
                w.set_cwuf(true);
            });
        }

        fn disable_interrupts(&mut self) {
            cortex_m::interrupt::disable();
        }

        fn arm_sleep(&mut self) {
            self.scb.set_sleepdeep();
        }

        fn gate_peripheral_clocks(&mut self) {
            // Keep PWREN, Standby entry still needs the PWR block
            pac::RCC.apb1enr().write(|w| w.set_pwren(true));
            pac::RCC.apb2enr().write(|_| {});
        }

        fn sleep(&mut self) {
            cortex_m::asm::dsb();
            cortex_m::asm::wfi();
        }

        fn disarm_sleep(&mut self) {
            self.scb.clear_sleepdeep();
        }
    }
}
