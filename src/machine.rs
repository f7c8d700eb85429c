//! Encrypt/decrypt pipeline.
//!
//! An [`Encryptor`] turns text into enciphered tape units and a
//! [`Decryptor`] turns them back. Each owns one [`StepEngine`] started from
//! the key's indicators, so independent sessions never share wheel state.
//!
//! For every tape unit the keystream character is sensed at the current
//! wheel positions, XORed with the unit, and the wheels then step:
//!
//! ```text
//! text ─► Encoder ─► unit ─┐                ┌─► unit ─► Decoder ─► text
//!                          XOR ─► cipher ─► XOR
//!            StepEngine ───┘                └─── StepEngine
//! ```

use tracing::debug;

use crate::baudot::{Decoder, Encoder, Shift, MAX_CODE};
use crate::config::{MachineConfig, ShiftStepping};
use crate::engine::StepEngine;
use crate::error::LorenzError;
use crate::key::KeyMaterial;

/// Enciphering session.
#[derive(Debug, Clone)]
pub struct Encryptor {
    engine: StepEngine,
    encoder: Encoder,
    stepping: ShiftStepping,
}

impl Encryptor {
    /// Starts a session at the key's indicators.
    pub fn new(key: &KeyMaterial, config: &MachineConfig) -> Self {
        debug!(
            shift_stepping = ?config.shift_stepping,
            initial_shift = ?config.initial_shift,
            "starting encryption session"
        );
        Encryptor {
            engine: StepEngine::new(key),
            encoder: Encoder::with_initial(config.initial_shift),
            stepping: config.shift_stepping,
        }
    }

    /// Enciphers one character, appending its units to `out`.
    ///
    /// # Parameters
    /// - `ch`: Plaintext character.
    /// - `out`: Sink for the enciphered units (one, or two with a shift).
    ///
    /// # Returns
    /// Number of units appended.
    ///
    /// # Errors
    /// Returns [`LorenzError::UnsupportedSymbol`] if `ch` has no teleprinter
    /// code. Nothing is appended and the wheels do not move.
    pub fn push_char(&mut self, ch: char, out: &mut Vec<u8>) -> Result<usize, LorenzError> {
        let encoded = self.encoder.encode(ch)?;
        let mut written = 1;
        if let Some(shift) = encoded.shift {
            let key = match self.stepping {
                ShiftStepping::OwnCycle => self.engine.next_keystream(),
                ShiftStepping::Combined => self.engine.keystream(),
            };
            out.push(shift.code() ^ key);
            written += 1;
        }
        out.push(encoded.code ^ self.engine.next_keystream());
        Ok(written)
    }

    /// Enciphers a whole string.
    ///
    /// # Errors
    /// Returns [`LorenzError::UnsupportedSymbol`] on the first character
    /// with no teleprinter code; the session has then consumed every
    /// character before it.
    pub fn encrypt_str(&mut self, text: &str) -> Result<Vec<u8>, LorenzError> {
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            self.push_char(ch, &mut out)?;
        }
        Ok(out)
    }

    /// Wheel state of this session.
    pub fn engine(&self) -> &StepEngine {
        &self.engine
    }
}

/// Deciphering session.
#[derive(Debug, Clone)]
pub struct Decryptor {
    engine: StepEngine,
    decoder: Decoder,
    stepping: ShiftStepping,
}

impl Decryptor {
    /// Starts a session at the key's indicators.
    ///
    /// The decoder always starts in letters shift.
    pub fn new(key: &KeyMaterial, config: &MachineConfig) -> Self {
        debug!(
            shift_stepping = ?config.shift_stepping,
            "starting decryption session"
        );
        Decryptor {
            engine: StepEngine::new(key),
            decoder: Decoder::new(),
            stepping: config.shift_stepping,
        }
    }

    /// Deciphers one tape unit.
    ///
    /// # Returns
    /// The printed character, or `None` for a shift code.
    ///
    /// # Errors
    /// Returns [`LorenzError::UnsupportedCode`] if `unit` is wider than
    /// 5 bits, or if the deciphered code is unassigned in the current shift.
    /// Either way the unit was consumed and the wheels have stepped for it,
    /// so the session stays in step with the sender.
    pub fn push_unit(&mut self, unit: u8) -> Result<Option<char>, LorenzError> {
        if unit > MAX_CODE {
            self.engine.step();
            return Err(LorenzError::UnsupportedCode(unit));
        }
        let plain = unit ^ self.engine.keystream();
        let shares_next = self.stepping == ShiftStepping::Combined
            && Shift::from_code(plain).is_some();
        if !shares_next {
            self.engine.step();
        }
        self.decoder.decode(plain)
    }

    /// Deciphers a whole tape.
    ///
    /// # Errors
    /// Returns the first error from [`push_unit`](Self::push_unit).
    pub fn decrypt_units(&mut self, units: &[u8]) -> Result<String, LorenzError> {
        let mut text = String::with_capacity(units.len());
        for &unit in units {
            if let Some(ch) = self.push_unit(unit)? {
                text.push(ch);
            }
        }
        Ok(text)
    }

    /// Current decoder shift.
    pub fn shift(&self) -> Shift {
        self.decoder.shift()
    }

    /// Wheel state of this session.
    pub fn engine(&self) -> &StepEngine {
        &self.engine
    }
}

/// Enciphers `text` with a fresh session.
///
/// # Errors
/// Returns [`LorenzError::UnsupportedSymbol`] for characters outside the
/// teleprinter alphabet.
///
/// # Examples
///
/// ```
/// use lorenz_sz40::{decrypt, encrypt, keygen, MachineConfig};
///
/// let key = keygen::generate();
/// let config = MachineConfig::default();
/// let cipher = encrypt(&key, &config, "ATTACK AT DAWN 0600").unwrap();
/// assert_eq!(decrypt(&key, &config, &cipher).unwrap(), "ATTACK AT DAWN 0600");
/// ```
pub fn encrypt(
    key: &KeyMaterial,
    config: &MachineConfig,
    text: &str,
) -> Result<Vec<u8>, LorenzError> {
    Encryptor::new(key, config).encrypt_str(text)
}

/// Deciphers `units` with a fresh session.
///
/// # Errors
/// Returns [`LorenzError::UnsupportedCode`] for units that are not 5-bit
/// codes or decipher to an unassigned figure.
pub fn decrypt(
    key: &KeyMaterial,
    config: &MachineConfig,
    units: &[u8],
) -> Result<String, LorenzError> {
    Decryptor::new(key, config).decrypt_units(units)
}

/// XORs an already coded tape with the keystream, one step per unit.
///
/// The operation is its own inverse: applying it twice with the same key
/// returns the original tape.
///
/// # Errors
/// Returns [`LorenzError::UnsupportedCode`] if a unit is wider than 5 bits.
pub fn crypt_tape(key: &KeyMaterial, units: &[u8]) -> Result<Vec<u8>, LorenzError> {
    let mut engine = StepEngine::new(key);
    units
        .iter()
        .map(|&unit| {
            let key_char = engine.next_keystream();
            if unit > MAX_CODE {
                return Err(LorenzError::UnsupportedCode(unit));
            }
            Ok(unit ^ key_char)
        })
        .collect()
}
