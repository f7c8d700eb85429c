//! Machine configuration shared by both ends of a link.
//!
//! Both the sender and the receiver must use the same configuration, in
//! addition to the same key, or the wheels fall out of step.

use serde::{Deserialize, Serialize};

pub use crate::baudot::InitialShift;

/// How shift codes interact with wheel motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStepping {
    /// A shift code is an ordinary tape character: it is enciphered with its
    /// own keystream character and steps the wheels.
    #[default]
    OwnCycle,
    /// A shift code shares the keystream character of the symbol it
    /// precedes; the wheels step once for the pair.
    Combined,
}

/// Settings for an [`Encryptor`](crate::Encryptor) or
/// [`Decryptor`](crate::Decryptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Shift code stepping rule.
    pub shift_stepping: ShiftStepping,
    /// Printer shift assumed by the encoder at the start of a message.
    pub initial_shift: InitialShift,
}

impl MachineConfig {
    /// Returns the config with a different shift stepping rule.
    pub fn with_shift_stepping(mut self, shift_stepping: ShiftStepping) -> Self {
        self.shift_stepping = shift_stepping;
        self
    }

    /// Returns the config with a different initial encoder shift.
    pub fn with_initial_shift(mut self, initial_shift: InitialShift) -> Self {
        self.initial_shift = initial_shift;
        self
    }
}
