//! Pinwheels: the atomic mechanical unit of the SZ40.
//!
//! A wheel is a fixed ring of pins, each set active (1) or inactive (0),
//! and a rotational offset naming the pin currently under the sensing
//! brush. Wheels are never resized after construction; only the offset
//! moves, and only the stepping engine moves it.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyFault, LorenzError};

/// Teeth counts of chi wheels 1 to 5.
pub const CHI_TEETH: [usize; 5] = [41, 31, 29, 26, 23];

/// Teeth counts of psi wheels 1 to 5.
pub const PSI_TEETH: [usize; 5] = [43, 47, 51, 53, 59];

/// Teeth counts of motor wheels 1 and 2 (the 61 and 37 wheels).
pub const MOTOR_TEETH: [usize; 2] = [61, 37];

/// Total number of wheels on the machine.
pub const NUM_WHEELS: usize = 12;

/// Functional group a wheel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelGroup {
    /// Regularly stepping wheels.
    Chi,
    /// Wheels gated by motor 2.
    Psi,
    /// Control wheels.
    Motor,
}

impl WheelGroup {
    /// Canonical teeth counts for the group, in wheel order.
    pub fn teeth(self) -> &'static [usize] {
        match self {
            WheelGroup::Chi => &CHI_TEETH,
            WheelGroup::Psi => &PSI_TEETH,
            WheelGroup::Motor => &MOTOR_TEETH,
        }
    }
}

impl fmt::Display for WheelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelGroup::Chi => write!(f, "chi"),
            WheelGroup::Psi => write!(f, "psi"),
            WheelGroup::Motor => write!(f, "motor"),
        }
    }
}

/// Names one of the 12 wheels.
///
/// The index is zero-based; `Display` uses the one-based names
/// operators used (`chi1`, `psi5`, `motor2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WheelId {
    group: WheelGroup,
    index: usize,
}

impl WheelId {
    /// All wheels in indicator order: chi 1-5, motor 1-2, psi 1-5.
    pub const ALL: [WheelId; NUM_WHEELS] = [
        WheelId::chi(0),
        WheelId::chi(1),
        WheelId::chi(2),
        WheelId::chi(3),
        WheelId::chi(4),
        WheelId::motor(0),
        WheelId::motor(1),
        WheelId::psi(0),
        WheelId::psi(1),
        WheelId::psi(2),
        WheelId::psi(3),
        WheelId::psi(4),
    ];

    /// Chi wheel `index` (0..5).
    pub const fn chi(index: usize) -> Self {
        WheelId {
            group: WheelGroup::Chi,
            index,
        }
    }

    /// Psi wheel `index` (0..5).
    pub const fn psi(index: usize) -> Self {
        WheelId {
            group: WheelGroup::Psi,
            index,
        }
    }

    /// Motor wheel `index` (0..2).
    pub const fn motor(index: usize) -> Self {
        WheelId {
            group: WheelGroup::Motor,
            index,
        }
    }

    /// Group the wheel belongs to.
    pub fn group(&self) -> WheelGroup {
        self.group
    }

    /// Zero-based position within its group.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Canonical number of teeth (pins) on this wheel.
    pub fn teeth(&self) -> usize {
        self.group.teeth()[self.index]
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.group, self.index + 1)
    }
}

/// A single pinwheel: a circular pin pattern and the current offset.
///
/// Pins and position are wiped when the wheel is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Wheel {
    pins: Vec<u8>,
    position: usize,
}

impl Wheel {
    /// Builds a wheel for `id`, validating it against the canonical size.
    ///
    /// # Parameters
    /// - `id`: Which wheel is being built.
    /// - `teeth`: Declared teeth count.
    /// - `pins`: Pin pattern, one `0`/`1` value per tooth.
    /// - `position`: Starting indicator.
    ///
    /// # Errors
    /// Returns [`LorenzError::InvalidKeyMaterial`] if the declared teeth
    /// count is not canonical, the pattern length disagrees with it, a pin
    /// is not 0 or 1, or the position is out of range.
    pub fn build(
        id: WheelId,
        teeth: usize,
        pins: Vec<u8>,
        position: usize,
    ) -> Result<Self, LorenzError> {
        let expected = id.teeth();
        if teeth != expected {
            return Err(KeyFault::TeethCount {
                wheel: id,
                expected,
                found: teeth,
            }
            .into());
        }
        if pins.len() != expected {
            return Err(KeyFault::PatternLength {
                wheel: id,
                expected,
                found: pins.len(),
            }
            .into());
        }
        if let Some((index, &value)) = pins.iter().enumerate().find(|&(_, &p)| p > 1) {
            return Err(KeyFault::PinValue {
                wheel: id,
                index,
                value,
            }
            .into());
        }
        if position >= expected {
            return Err(KeyFault::Position {
                wheel: id,
                position,
                teeth: expected,
            }
            .into());
        }
        Ok(Wheel { pins, position })
    }

    /// Builds a wheel from parts already known to be valid.
    pub(crate) fn from_valid(pins: Vec<u8>, position: usize) -> Self {
        debug_assert!(position < pins.len());
        Wheel { pins, position }
    }

    /// Value of the pin at the current position.
    pub fn active_pin(&self) -> u8 {
        self.pins[self.position]
    }

    /// Rotates the wheel forward by one tooth.
    pub fn advance(&mut self) {
        self.position += 1;
        if self.position == self.pins.len() {
            self.position = 0;
        }
    }

    /// Number of teeth (pins) on the wheel.
    pub fn teeth(&self) -> usize {
        self.pins.len()
    }

    /// Current rotational offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Pin pattern starting at tooth 0.
    pub fn pins(&self) -> &[u8] {
        &self.pins
    }

    /// Returns `true` if every pin has the same value.
    pub fn is_degenerate(&self) -> bool {
        match self.pins.split_first() {
            Some((first, rest)) => rest.iter().all(|p| p == first),
            None => true,
        }
    }

    /// Moves the wheel to `position` without validation.
    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl fmt::Debug for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wheel")
            .field("teeth", &self.pins.len())
            .field("pins", &"[REDACTED]")
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i + 1) % 2) as u8).collect()
    }

    #[test]
    fn test_wheel_id_display() {
        assert_eq!(WheelId::chi(0).to_string(), "chi1");
        assert_eq!(WheelId::psi(4).to_string(), "psi5");
        assert_eq!(WheelId::motor(1).to_string(), "motor2");
    }

    #[test]
    fn test_wheel_id_teeth() {
        assert_eq!(WheelId::chi(0).teeth(), 41);
        assert_eq!(WheelId::chi(4).teeth(), 23);
        assert_eq!(WheelId::psi(0).teeth(), 43);
        assert_eq!(WheelId::psi(4).teeth(), 59);
        assert_eq!(WheelId::motor(0).teeth(), 61);
        assert_eq!(WheelId::motor(1).teeth(), 37);
    }

    #[test]
    fn test_all_is_indicator_order() {
        let names: Vec<String> = WheelId::ALL.iter().map(|id| id.to_string()).collect();
        assert_eq!(
            names,
            [
                "chi1", "chi2", "chi3", "chi4", "chi5", "motor1", "motor2", "psi1", "psi2",
                "psi3", "psi4", "psi5"
            ]
        );
    }

    #[test]
    fn test_build_valid() {
        let wheel = Wheel::build(WheelId::chi(4), 23, alternating(23), 22).unwrap();
        assert_eq!(wheel.teeth(), 23);
        assert_eq!(wheel.position(), 22);
        assert_eq!(wheel.active_pin(), 1);
    }

    #[test]
    fn test_build_rejects_wrong_teeth() {
        let result = Wheel::build(WheelId::chi(4), 24, alternating(24), 0);
        assert_eq!(
            result.unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::TeethCount {
                wheel: WheelId::chi(4),
                expected: 23,
                found: 24,
            })
        );
    }

    #[test]
    fn test_build_rejects_short_pattern() {
        let result = Wheel::build(WheelId::motor(1), 37, alternating(36), 0);
        assert_eq!(
            result.unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::PatternLength {
                wheel: WheelId::motor(1),
                expected: 37,
                found: 36,
            })
        );
    }

    #[test]
    fn test_build_rejects_bad_pin() {
        let mut pins = alternating(37);
        pins[5] = 2;
        let result = Wheel::build(WheelId::motor(1), 37, pins, 0);
        assert_eq!(
            result.unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::PinValue {
                wheel: WheelId::motor(1),
                index: 5,
                value: 2,
            })
        );
    }

    #[test]
    fn test_build_rejects_position_out_of_range() {
        let result = Wheel::build(WheelId::psi(0), 43, alternating(43), 43);
        assert_eq!(
            result.unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::Position {
                wheel: WheelId::psi(0),
                position: 43,
                teeth: 43,
            })
        );
    }

    #[test]
    fn test_advance_wraps() {
        let mut wheel = Wheel::build(WheelId::chi(4), 23, alternating(23), 21).unwrap();
        wheel.advance();
        assert_eq!(wheel.position(), 22);
        wheel.advance();
        assert_eq!(wheel.position(), 0);
    }

    #[test]
    fn test_full_revolution_returns_to_start() {
        let mut wheel = Wheel::build(WheelId::psi(2), 51, alternating(51), 17).unwrap();
        let mut seen = Vec::with_capacity(51);
        for _ in 0..51 {
            seen.push(wheel.active_pin());
            wheel.advance();
        }
        assert_eq!(wheel.position(), 17);
        // Odd-length alternating pattern: pins 50 and 0 are both active.
        assert_eq!(seen[50 - 17], 1);
        assert_eq!(seen[51 - 17], 1);
    }

    #[test]
    fn test_degenerate_detection() {
        let ones = Wheel::build(WheelId::chi(4), 23, vec![1; 23], 0).unwrap();
        let zeros = Wheel::build(WheelId::chi(4), 23, vec![0; 23], 0).unwrap();
        let mixed = Wheel::build(WheelId::chi(4), 23, alternating(23), 0).unwrap();
        assert!(ones.is_degenerate());
        assert!(zeros.is_degenerate());
        assert!(!mixed.is_degenerate());
    }

    #[test]
    fn test_debug_redacts_pins() {
        let wheel = Wheel::build(WheelId::chi(4), 23, alternating(23), 3).unwrap();
        let text = format!("{:?}", wheel);
        assert!(text.contains("REDACTED"));
        assert!(text.contains("position: 3"));
    }
}
