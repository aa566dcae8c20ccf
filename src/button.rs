//! Debounced momentary button.
//!
//! The button pulls its input low when pressed (internal pull-up, released
//! reads high). Debouncing is done by pattern matching over the most recent
//! raw samples rather than with a timer; the caller polls at a steady rate.

use embedded_hal::digital::v2::InputPin;

/// Raw history with every sample at the released level.
const RELEASED_HISTORY: u8 = 0xFF;

/// Window of samples that must match [`CLEAN_PRESS_PATTERN`].
const WINDOW_MASK: u8 = 0b1111;

/// Oldest three samples low (held), newest sample high (contact opened).
const CLEAN_PRESS_PATTERN: u8 = 0b0001;

/// Button reporting one clean press per physical press.
pub struct DebouncedButton<PIN> {
    pin: PIN,
    /// Most recent raw samples, newest in bit 0
    history: u8,
}

impl<PIN, E> DebouncedButton<PIN>
where
    PIN: InputPin<Error = E>,
{
    /// Creates a button whose history starts out fully released, so a button
    /// that is simply idle at power-up never reports a press.
    pub fn new(pin: PIN) -> Self {
        Self {
            pin,
            history: RELEASED_HISTORY,
        }
    }

    /// Samples the pin once and reports whether a clean press just completed.
    ///
    /// The sample is shifted into bit 0 of the history. A press is reported
    /// only when the last four samples read low, low, low, high (oldest
    /// first): three consecutive pressed polls followed by the edge. Shorter
    /// contacts and single-sample glitches never produce that window, and a
    /// held button cannot match it again until it has been pressed anew.
    pub fn poll_for_clean_press(&mut self) -> Result<bool, E> {
        let level = self.pin.is_high()?;
        self.history = self.history << 1 | u8::from(level);
        Ok(self.history & WINDOW_MASK == CLEAN_PRESS_PATTERN)
    }
}
