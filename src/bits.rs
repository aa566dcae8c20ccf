//! Bit-order helpers for the shift chains.
//!
//! The chains are wired so that the first bit clocked in ends up on the
//! last physical output, which is the mirror of the logical light order.

/// Reverses the bit order of a byte (bit 0 <-> bit 7, bit 1 <-> bit 6, ...).
///
/// Three swap-and-mask stages: nibbles, then bit pairs, then adjacent bits.
pub const fn reverse_bits(value: u8) -> u8 {
    let value = (value & 0xF0) >> 4 | (value & 0x0F) << 4;
    let value = (value & 0xCC) >> 2 | (value & 0x33) << 2;
    (value & 0xAA) >> 1 | (value & 0x55) << 1
}
