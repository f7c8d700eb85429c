//! Error types for the Lorenz SZ40 library.
//!
//! Every error is surfaced to the caller. Nothing here is retryable: the
//! machine is deterministic, so repeating a failed operation with the same
//! input fails the same way.

use thiserror::Error;

use crate::wheel::{WheelGroup, WheelId};

/// Errors produced by the Lorenz SZ40 library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LorenzError {
    /// Character has no code in the ITA2 letters or figures tables.
    #[error("character {0:?} is not in the teleprinter alphabet")]
    UnsupportedSymbol(char),
    /// Tape unit is wider than 5 bits, or unassigned in the current shift.
    #[error("code {0:#04x} is not a teleprinter character in the current shift")]
    UnsupportedCode(u8),
    /// Key material failed validation at load time.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(KeyFault),
    /// Wheel pattern is all-0 or all-1.
    #[error("wheel {0} has a degenerate pin pattern")]
    DegenerateWheelPattern(WheelId),
}

/// Reason a key snapshot was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFault {
    /// A wheel group does not hold the canonical number of wheels.
    #[error("{group} group has {found} wheels, expected {expected}")]
    WheelCount {
        group: WheelGroup,
        expected: usize,
        found: usize,
    },
    /// Declared teeth count differs from the wheel's canonical size.
    #[error("wheel {wheel} declares {found} teeth, expected {expected}")]
    TeethCount {
        wheel: WheelId,
        expected: usize,
        found: usize,
    },
    /// Pin pattern length differs from the teeth count.
    #[error("wheel {wheel} has {found} pins, expected {expected}")]
    PatternLength {
        wheel: WheelId,
        expected: usize,
        found: usize,
    },
    /// A pin is neither 0 nor 1.
    #[error("wheel {wheel} pin {index} has value {value}")]
    PinValue {
        wheel: WheelId,
        index: usize,
        value: u8,
    },
    /// Indicator lies outside `[0, teeth)`.
    #[error("wheel {wheel} indicator {position} is outside 0..{teeth}")]
    Position {
        wheel: WheelId,
        position: usize,
        teeth: usize,
    },
}

impl From<KeyFault> for LorenzError {
    fn from(fault: KeyFault) -> Self {
        LorenzError::InvalidKeyMaterial(fault)
    }
}
