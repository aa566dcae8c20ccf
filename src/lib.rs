//! Control core for a battery-powered eight-night menorah.
//!
//! Each press of the button lights the next night's pair of lights; the
//! eighth press extinguishes everything and halts the MCU until the reset
//! button is used.
//!
//! # Module Organization
//!
//! - [`bits`] - Bit-order reversal for the mirrored chain wiring
//! - [`shift_driver`] - Two lock-stepped 8-output shift chains
//! - [`indicator`] - Two-line helper (shamash) light
//! - [`button`] - Pattern-debounced momentary button
//! - [`sequencer`] - Night masks and the press-driven state machine
//! - [`power`] - Ordered power-down into the deepest sleep mode
//! - [`config`] - Timing and pattern constants
//!
//! Everything here is written against the `embedded-hal` traits; the
//! firmware binary binds it to the STM32L031 pins.

#![cfg_attr(not(test), no_std)]

pub mod bits;
pub mod button;
pub mod config;
pub mod indicator;
pub mod power;
pub mod sequencer;
pub mod shift_driver;

pub use button::DebouncedButton;
pub use config::{FirmwareConfig, ShiftTiming};
pub use indicator::IndicatorLight;
pub use power::{LowPowerMcu, power_down};
pub use sequencer::{Night, NightSequencer, SequencerState, ShiftFrame, Step};
pub use shift_driver::{DualChannelShiftDriver, FrameOutput};
