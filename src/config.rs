//! Fixed configuration for the menorah firmware.
//!
//! Pin identities are bound in the `hardware` module of the firmware binary;
//! this module only carries the timing and pattern constants that the
//! hardware-agnostic components are constructed with.

/// Number of nights in the sequence.
pub const NIGHTS: u8 = 8;

/// Indicator pattern used while the device is halted.
pub const INDICATOR_OFF: u8 = 0b00;

/// Timing of the serial protocol used by the shift chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftTiming {
    /// Delay observed before and after every clock and latch rising edge.
    pub bit_delay_us: u32,
}

impl ShiftTiming {
    /// 5 µs around every edge, well above the 74HC595 minimum pulse width.
    pub const DEFAULT: Self = Self { bit_delay_us: 5 };
}

/// Top-level firmware configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FirmwareConfig {
    /// Shift chain timing.
    pub shift: ShiftTiming,
    /// Button polling period in milliseconds.
    ///
    /// The debounce window is four polls, so this also sets how long a
    /// press must be held before it counts.
    pub poll_interval_ms: u64,
    /// Indicator pattern shown from power-on until halt.
    pub indicator_on: u8,
}

impl FirmwareConfig {
    /// Board defaults: 100 ms polls and indicator line 0 driven high.
    pub const DEFAULT: Self = Self {
        shift: ShiftTiming::DEFAULT,
        poll_interval_ms: 100,
        indicator_on: 0b01,
    };
}
