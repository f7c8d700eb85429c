//! Stepping engine: the SZ40 wheel motion rule.
//!
//! Once per character the engine moves the wheels as follows:
//!
//! ```text
//! motor1  always steps; its pin *before* the step decides motor2
//! motor2  steps only if motor1's pin was 1
//! chi1-5  always step
//! psi1-5  step together only if motor2's pin *after* its own move is 1
//! ```
//!
//! The psi hold ("limitation") is what separates the periodic chi stream
//! from the irregular psi stream. Sampling either motor pin at the wrong
//! moment silently desynchronizes the two ends of a link.

use tracing::trace;

use crate::combiner;
use crate::key::KeyMaterial;
use crate::wheel::{WheelId, NUM_WHEELS};

/// How the wheels moved during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// Motor 2 advanced.
    pub motor2_advanced: bool,
    /// The psi wheels advanced.
    pub psi_advanced: bool,
}

/// Live wheel state of one encryption or decryption session.
///
/// The engine works on its own copy of the key; the snapshot it was built
/// from is never modified.
#[derive(Debug, Clone)]
pub struct StepEngine {
    bank: KeyMaterial,
    steps: u64,
}

impl StepEngine {
    /// Creates an engine positioned at the key's indicators.
    pub fn new(key: &KeyMaterial) -> Self {
        StepEngine {
            bank: key.clone(),
            steps: 0,
        }
    }

    /// Keystream character at the current positions.
    pub fn keystream(&self) -> u8 {
        combiner::keystream(&self.bank.chi, &self.bank.psi)
    }

    /// Chi-only contribution at the current positions.
    pub fn chi_vector(&self) -> u8 {
        combiner::pin_vector(&self.bank.chi)
    }

    /// Psi-only contribution at the current positions.
    pub fn psi_vector(&self) -> u8 {
        combiner::pin_vector(&self.bank.psi)
    }

    /// Advances the wheels by one character.
    pub fn step(&mut self) -> Motion {
        let [mu1, mu2] = &mut self.bank.motor;

        let mu1_pin = mu1.active_pin();
        mu1.advance();
        let motor2_advanced = mu1_pin == 1;
        if motor2_advanced {
            mu2.advance();
        }

        for chi in self.bank.chi.iter_mut() {
            chi.advance();
        }

        let psi_advanced = mu2.active_pin() == 1;
        if psi_advanced {
            for psi in self.bank.psi.iter_mut() {
                psi.advance();
            }
        }

        self.steps += 1;
        trace!(step = self.steps, "wheels stepped");
        Motion {
            motor2_advanced,
            psi_advanced,
        }
    }

    /// Returns the keystream at the current positions, then steps.
    pub fn next_keystream(&mut self) -> u8 {
        let key = self.keystream();
        self.step();
        key
    }

    /// Number of steps taken since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current positions in indicator order `[K1..K5, M1, M2, S1..S5]`.
    pub fn positions(&self) -> [usize; NUM_WHEELS] {
        self.bank.indicators()
    }

    /// Current position of a single wheel.
    pub fn position(&self, id: WheelId) -> usize {
        self.bank.wheel(id).position()
    }

    /// Live wheel bank.
    pub fn wheels(&self) -> &KeyMaterial {
        &self.bank
    }
}

impl Iterator for StepEngine {
    type Item = u8;

    /// Infinite keystream; each item is sensed before the wheels move.
    fn next(&mut self) -> Option<u8> {
        Some(self.next_keystream())
    }
}
