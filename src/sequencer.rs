//! Night sequencing state machine.
//!
//! Maps the number of clean presses since reset to the lights that are lit
//! and halts the device after the last night.
//!
//! ```text
//! Awake(0) → Awake(1) → … → Awake(7) → Halted
//! ```
//!
//! Every night keeps the lights of all earlier nights lit, so night `n`
//! shows the lowest `2 * (n + 1)` lights. `Halted` is terminal for the
//! power-on session; only the reset button brings the device back to
//! `Awake(0)`.

use embedded_hal::digital::v2::OutputPin;

use crate::bits::reverse_bits;
use crate::config::NIGHTS;
use crate::indicator::IndicatorLight;
use crate::power::{LowPowerMcu, power_down};
use crate::shift_driver::FrameOutput;

/// Mask with every light lit.
const ALL_LIGHTS: u16 = 0xFFFF;

/// A displayable night, 0 through 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Night(u8);

impl Night {
    /// Night shown at power-on.
    pub const FIRST: Self = Self(0);
    /// Night with every light lit; the next press halts.
    pub const LAST: Self = Self(NIGHTS - 1);

    /// Returns the night with the given index, if it is displayable.
    pub const fn new(index: u8) -> Option<Self> {
        if index < NIGHTS { Some(Self(index)) } else { None }
    }

    /// Zero-based night number.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The following night, or `None` after the last one.
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Lights lit on this night, bit `i` for light `i`.
    ///
    /// The all-lights mask is shifted right (zero fill) by two lights for
    /// every night still to come.
    pub const fn illumination_mask(self) -> u16 {
        ALL_LIGHTS >> (2 * (Self::LAST.0 - self.0))
    }

    /// This night's mask as chain bytes, ready for [`FrameOutput::show`].
    pub const fn shift_frame(self) -> ShiftFrame {
        ShiftFrame::from_mask(self.illumination_mask())
    }
}

/// One byte per shift chain, already in wiring order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftFrame {
    /// Lights 0..=7 for chain A
    pub low: u8,
    /// Lights 8..=15 for chain B
    pub high: u8,
}

impl ShiftFrame {
    /// Every light dark.
    pub const BLANK: Self = Self { low: 0, high: 0 };

    /// Splits a light mask into its two chain bytes, each bit-reversed to
    /// match the mirrored wiring.
    pub const fn from_mask(mask: u16) -> Self {
        let [low, high] = mask.to_le_bytes();
        Self {
            low: reverse_bits(low),
            high: reverse_bits(high),
        }
    }
}

/// Sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    /// Showing the given night and polling for presses
    Awake(Night),
    /// Powered down; nothing more happens until reset
    Halted,
}

/// Outcome of a clean press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The given night is now shown
    Lit(Night),
    /// The last night passed and the device powered down
    Halted,
    /// Already halted, the press had no effect
    Ignored,
}

/// Control core tying the lights, the indicator and the MCU power control to
/// the night count.
pub struct NightSequencer<D, P0, P1, M> {
    lights: D,
    indicator: IndicatorLight<P0, P1>,
    mcu: M,
    /// Indicator pattern while awake
    indicator_on: u8,
    state: SequencerState,
}

impl<D, P0, P1, M, E> NightSequencer<D, P0, P1, M>
where
    D: FrameOutput<Error = E>,
    P0: OutputPin<Error = E>,
    P1: OutputPin<Error = E>,
    M: LowPowerMcu,
{
    /// Creates a sequencer at night 0. Nothing is shown until [`start`].
    ///
    /// # Arguments
    ///
    /// * `lights` - Initialized shift chains, outputs may still be blanked
    /// * `indicator` - Helper light
    /// * `mcu` - Low-power control used when the last night passes
    /// * `indicator_on` - Indicator pattern shown while awake
    ///
    /// [`start`]: Self::start
    pub fn new(lights: D, indicator: IndicatorLight<P0, P1>, mcu: M, indicator_on: u8) -> Self {
        Self {
            lights,
            indicator,
            mcu,
            indicator_on,
            state: SequencerState::Awake(Night::FIRST),
        }
    }

    /// Enters the initial state: indicator on and night 0 shown.
    pub fn start(&mut self) -> Result<(), E> {
        self.indicator.set(self.indicator_on)?;
        self.lights.show(Night::FIRST.shift_frame())?;
        self.lights.set_output_enabled(true)?;
        self.state = SequencerState::Awake(Night::FIRST);
        Ok(())
    }

    /// Advances one night, or powers down after the last night.
    ///
    /// On real hardware the power-down never returns; if it does (a wake-up
    /// other than reset) the sequencer stays halted and ignores every
    /// further press.
    pub fn on_clean_press(&mut self) -> Result<Step, E> {
        let SequencerState::Awake(night) = self.state else {
            return Ok(Step::Ignored);
        };

        match night.next() {
            Some(next) => {
                self.lights.show(next.shift_frame())?;
                self.state = SequencerState::Awake(next);
                Ok(Step::Lit(next))
            }
            None => {
                self.state = SequencerState::Halted;
                power_down(&mut self.lights, &mut self.indicator, &mut self.mcu)?;
                Ok(Step::Halted)
            }
        }
    }

    /// Current state of the sequence.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The night being shown, `None` once halted.
    pub fn night(&self) -> Option<Night> {
        match self.state {
            SequencerState::Awake(night) => Some(night),
            SequencerState::Halted => None,
        }
    }

    /// True once the last night has passed and power-down ran.
    pub fn is_halted(&self) -> bool {
        self.state == SequencerState::Halted
    }
}
