//! Keystream combination: chi XOR psi.
//!
//! Wheel *i* of each bank feeds impulse *i* of the 5-bit character, with
//! wheel 1 on the least-significant bit. Motor wheels never appear here.

use crate::wheel::Wheel;

/// Packs the active pins of a five-wheel bank into a 5-bit value.
pub fn pin_vector(wheels: &[Wheel; 5]) -> u8 {
    wheels
        .iter()
        .enumerate()
        .fold(0u8, |acc, (bit, wheel)| acc | (wheel.active_pin() << bit))
}

/// Keystream character at the current wheel positions.
///
/// # Parameters
/// - `chi`: The five chi wheels.
/// - `psi`: The five psi wheels.
///
/// # Returns
/// `chi[i] ^ psi[i]` for each impulse, packed into the low 5 bits.
pub fn keystream(chi: &[Wheel; 5], psi: &[Wheel; 5]) -> u8 {
    pin_vector(chi) ^ pin_vector(psi)
}
