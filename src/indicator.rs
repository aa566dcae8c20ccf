//! Helper (shamash) indicator light.
//!
//! The indicator hangs between two GPIO lines, so it is addressed with a
//! 2-bit value: bit 0 drives the first line and bit 1 the second.

use embedded_hal::digital::v2::OutputPin;

/// Two-line indicator light.
pub struct IndicatorLight<P0, P1> {
    pin0: P0,
    pin1: P1,
}

impl<P0, P1, E> IndicatorLight<P0, P1>
where
    P0: OutputPin<Error = E>,
    P1: OutputPin<Error = E>,
{
    /// Creates an indicator. The pins keep their current level until
    /// [`set`](Self::set) is called.
    ///
    /// # Arguments
    ///
    /// * `pin0` - Line driven from bit 0
    /// * `pin1` - Line driven from bit 1
    pub fn new(pin0: P0, pin1: P1) -> Self {
        Self { pin0, pin1 }
    }

    /// Drives `pin0` from bit 0 and `pin1` from bit 1 of `value`.
    ///
    /// Higher bits are ignored.
    pub fn set(&mut self, value: u8) -> Result<(), E> {
        self.pin0.set_state((value & 0b01 != 0).into())?;
        self.pin1.set_state((value & 0b10 != 0).into())
    }
}
