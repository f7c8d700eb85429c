//! Key material: pin patterns and indicators for all 12 wheels.
//!
//! A [`KeyMaterial`] is the complete secret setting of the machine. It is a
//! starting snapshot: sessions clone it into their own stepping engine, so
//! the snapshot itself never moves.
//!
//! Key storage lives outside this crate. Collaborators exchange keys as a
//! [`KeySettings`] value (or any serde format of it); deserializing into
//! `KeyMaterial` validates every wheel before a session can start.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyFault, LorenzError};
use crate::wheel::{Wheel, WheelGroup, WheelId, NUM_WHEELS};

/// Full wheel bank of the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KeySettings", into = "KeySettings")]
pub struct KeyMaterial {
    pub(crate) chi: [Wheel; 5],
    pub(crate) psi: [Wheel; 5],
    pub(crate) motor: [Wheel; 2],
}

/// Serializable snapshot of one wheel.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct WheelSettings {
    /// Declared number of teeth.
    pub teeth: usize,
    /// Pin pattern, one `0`/`1` entry per tooth.
    pub pins: Vec<u8>,
    /// Starting position.
    pub indicator: usize,
}

impl fmt::Debug for WheelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WheelSettings")
            .field("teeth", &self.teeth)
            .field("pins", &"[REDACTED]")
            .field("indicator", &self.indicator)
            .finish()
    }
}

/// Serializable snapshot of a whole key, grouped by wheel function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySettings {
    /// Chi wheels 1 to 5.
    pub chi: Vec<WheelSettings>,
    /// Psi wheels 1 to 5.
    pub psi: Vec<WheelSettings>,
    /// Motor wheels 1 (61) and 2 (37).
    pub motor: Vec<WheelSettings>,
}

impl KeyMaterial {
    /// Assembles key material from already validated wheels.
    pub(crate) fn from_wheels(chi: [Wheel; 5], psi: [Wheel; 5], motor: [Wheel; 2]) -> Self {
        KeyMaterial { chi, psi, motor }
    }

    /// Builds key material by asking `f` for each wheel's pins and indicator.
    ///
    /// `f` is called once per wheel in [`WheelId::ALL`] order.
    ///
    /// # Errors
    /// Returns [`LorenzError::InvalidKeyMaterial`] for the first wheel that
    /// fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use lorenz_sz40::KeyMaterial;
    ///
    /// let key = KeyMaterial::try_from_fn(|id| {
    ///     let pins = (0..id.teeth()).map(|i| (i % 2) as u8).collect();
    ///     (pins, 0)
    /// })
    /// .unwrap();
    /// assert_eq!(key.indicators(), [0; 12]);
    /// ```
    pub fn try_from_fn<F>(mut f: F) -> Result<Self, LorenzError>
    where
        F: FnMut(WheelId) -> (Vec<u8>, usize),
    {
        let mut chi = Vec::with_capacity(5);
        let mut psi = Vec::with_capacity(5);
        let mut motor = Vec::with_capacity(2);
        for id in WheelId::ALL {
            let (pins, indicator) = f(id);
            let wheel = Wheel::build(id, id.teeth(), pins, indicator)?;
            match id.group() {
                WheelGroup::Chi => chi.push(wheel),
                WheelGroup::Psi => psi.push(wheel),
                WheelGroup::Motor => motor.push(wheel),
            }
        }
        Ok(KeyMaterial {
            chi: into_group(WheelGroup::Chi, chi)?,
            psi: into_group(WheelGroup::Psi, psi)?,
            motor: into_group(WheelGroup::Motor, motor)?,
        })
    }

    /// Returns the wheel named by `id`.
    pub fn wheel(&self, id: WheelId) -> &Wheel {
        match id.group() {
            WheelGroup::Chi => &self.chi[id.index()],
            WheelGroup::Psi => &self.psi[id.index()],
            WheelGroup::Motor => &self.motor[id.index()],
        }
    }

    fn wheel_mut(&mut self, id: WheelId) -> &mut Wheel {
        match id.group() {
            WheelGroup::Chi => &mut self.chi[id.index()],
            WheelGroup::Psi => &mut self.psi[id.index()],
            WheelGroup::Motor => &mut self.motor[id.index()],
        }
    }

    /// Starting positions in indicator order `[K1..K5, M1, M2, S1..S5]`.
    pub fn indicators(&self) -> [usize; NUM_WHEELS] {
        WheelId::ALL.map(|id| self.wheel(id).position())
    }

    /// Returns a copy of this key with new starting positions.
    ///
    /// Pin patterns are kept; only the indicators change, as when a new
    /// message is sent on the same wheel patterns.
    ///
    /// # Parameters
    /// - `indicators`: Positions in `[K1..K5, M1, M2, S1..S5]` order.
    ///
    /// # Errors
    /// Returns [`LorenzError::InvalidKeyMaterial`] if any position is not
    /// below its wheel's teeth count.
    pub fn with_indicators(&self, indicators: [usize; NUM_WHEELS]) -> Result<Self, LorenzError> {
        for (id, &position) in WheelId::ALL.iter().zip(indicators.iter()) {
            if position >= id.teeth() {
                return Err(KeyFault::Position {
                    wheel: *id,
                    position,
                    teeth: id.teeth(),
                }
                .into());
            }
        }
        let mut key = self.clone();
        for (id, position) in WheelId::ALL.into_iter().zip(indicators) {
            key.wheel_mut(id).set_position(position);
        }
        Ok(key)
    }

    /// Wheels whose pins are all 0 or all 1.
    pub fn degenerate_wheels(&self) -> Vec<WheelId> {
        WheelId::ALL
            .into_iter()
            .filter(|&id| self.wheel(id).is_degenerate())
            .collect()
    }

    /// Checks that no wheel has a constant pin pattern.
    ///
    /// Degenerate wheels still step correctly; whether to refuse them is the
    /// caller's policy.
    ///
    /// # Errors
    /// Returns [`LorenzError::DegenerateWheelPattern`] for the first
    /// degenerate wheel in indicator order.
    pub fn check_degenerate(&self) -> Result<(), LorenzError> {
        match self.degenerate_wheels().first() {
            Some(&id) => Err(LorenzError::DegenerateWheelPattern(id)),
            None => Ok(()),
        }
    }

    /// Exports the key as a serializable snapshot.
    pub fn settings(&self) -> KeySettings {
        let snapshot = |wheels: &[Wheel]| -> Vec<WheelSettings> {
            wheels
                .iter()
                .map(|w| WheelSettings {
                    teeth: w.teeth(),
                    pins: w.pins().to_vec(),
                    indicator: w.position(),
                })
                .collect()
        };
        KeySettings {
            chi: snapshot(&self.chi),
            psi: snapshot(&self.psi),
            motor: snapshot(&self.motor),
        }
    }
}

fn into_group<const N: usize>(
    group: WheelGroup,
    wheels: Vec<Wheel>,
) -> Result<[Wheel; N], LorenzError> {
    let found = wheels.len();
    wheels.try_into().map_err(|_| {
        LorenzError::InvalidKeyMaterial(KeyFault::WheelCount {
            group,
            expected: N,
            found,
        })
    })
}

fn load_group<const N: usize>(
    group: WheelGroup,
    settings: &[WheelSettings],
) -> Result<[Wheel; N], LorenzError> {
    if settings.len() != N {
        return Err(KeyFault::WheelCount {
            group,
            expected: N,
            found: settings.len(),
        }
        .into());
    }
    let wheels = settings
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let id = match group {
                WheelGroup::Chi => WheelId::chi(index),
                WheelGroup::Psi => WheelId::psi(index),
                WheelGroup::Motor => WheelId::motor(index),
            };
            Wheel::build(id, s.teeth, s.pins.clone(), s.indicator)
        })
        .collect::<Result<Vec<_>, _>>()?;
    into_group(group, wheels)
}

impl TryFrom<KeySettings> for KeyMaterial {
    type Error = LorenzError;

    fn try_from(settings: KeySettings) -> Result<Self, Self::Error> {
        let key = KeyMaterial {
            chi: load_group(WheelGroup::Chi, &settings.chi)?,
            psi: load_group(WheelGroup::Psi, &settings.psi)?,
            motor: load_group(WheelGroup::Motor, &settings.motor)?,
        };
        for id in key.degenerate_wheels() {
            warn!(wheel = %id, "loaded key has a degenerate pin pattern");
        }
        Ok(key)
    }
}

impl From<KeyMaterial> for KeySettings {
    fn from(key: KeyMaterial) -> Self {
        key.settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(id: WheelId) -> (Vec<u8>, usize) {
        let pins = (0..id.teeth()).map(|i| ((i + id.index()) % 3 == 0) as u8).collect();
        (pins, id.teeth() / 2)
    }

    #[test]
    fn test_try_from_fn_builds_all_wheels() {
        let key = KeyMaterial::try_from_fn(patterned).unwrap();
        for id in WheelId::ALL {
            assert_eq!(key.wheel(id).teeth(), id.teeth());
            assert_eq!(key.wheel(id).position(), id.teeth() / 2);
        }
    }

    #[test]
    fn test_try_from_fn_propagates_first_fault() {
        let result = KeyMaterial::try_from_fn(|id| {
            let (pins, indicator) = patterned(id);
            if id == WheelId::motor(0) {
                (pins, 61)
            } else {
                (pins, indicator)
            }
        });
        assert_eq!(
            result.unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::Position {
                wheel: WheelId::motor(0),
                position: 61,
                teeth: 61,
            })
        );
    }

    #[test]
    fn test_indicators_order() {
        let key = KeyMaterial::try_from_fn(|id| {
            let (pins, _) = patterned(id);
            (pins, id.index() + if id.group() == WheelGroup::Motor { 10 } else { 0 })
        })
        .unwrap();
        assert_eq!(key.indicators(), [0, 1, 2, 3, 4, 10, 11, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_with_indicators_keeps_pins() {
        let key = KeyMaterial::try_from_fn(patterned).unwrap();
        let moved = key
            .with_indicators([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
            .unwrap();
        assert_eq!(moved.indicators(), [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        for id in WheelId::ALL {
            assert_eq!(moved.wheel(id).pins(), key.wheel(id).pins());
        }
        // The original snapshot is untouched.
        assert_eq!(key.indicators(), KeyMaterial::try_from_fn(patterned).unwrap().indicators());
    }

    #[test]
    fn test_with_indicators_rejects_out_of_range() {
        let key = KeyMaterial::try_from_fn(patterned).unwrap();
        let mut indicators = [0; NUM_WHEELS];
        indicators[6] = 37;
        assert_eq!(
            key.with_indicators(indicators).unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::Position {
                wheel: WheelId::motor(1),
                position: 37,
                teeth: 37,
            })
        );
    }

    #[test]
    fn test_check_degenerate() {
        let key = KeyMaterial::try_from_fn(patterned).unwrap();
        assert!(key.check_degenerate().is_ok());

        let key = KeyMaterial::try_from_fn(|id| {
            if id == WheelId::psi(2) {
                (vec![1; id.teeth()], 0)
            } else {
                patterned(id)
            }
        })
        .unwrap();
        assert_eq!(key.degenerate_wheels(), vec![WheelId::psi(2)]);
        assert_eq!(
            key.check_degenerate(),
            Err(LorenzError::DegenerateWheelPattern(WheelId::psi(2)))
        );
    }

    #[test]
    fn test_settings_roundtrip() {
        let key = KeyMaterial::try_from_fn(patterned).unwrap();
        let restored = KeyMaterial::try_from(key.settings()).unwrap();
        assert_eq!(restored, key);
    }

    #[test]
    fn test_load_rejects_missing_wheel() {
        let mut settings = KeyMaterial::try_from_fn(patterned).unwrap().settings();
        settings.psi.pop();
        assert_eq!(
            KeyMaterial::try_from(settings).unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::WheelCount {
                group: WheelGroup::Psi,
                expected: 5,
                found: 4,
            })
        );
    }

    #[test]
    fn test_load_rejects_non_canonical_teeth() {
        let mut settings = KeyMaterial::try_from_fn(patterned).unwrap().settings();
        settings.chi[0].teeth = 23;
        settings.chi[0].pins.truncate(23);
        assert_eq!(
            KeyMaterial::try_from(settings).unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::TeethCount {
                wheel: WheelId::chi(0),
                expected: 41,
                found: 23,
            })
        );
    }

    #[test]
    fn test_load_rejects_length_mismatch() {
        let mut settings = KeyMaterial::try_from_fn(patterned).unwrap().settings();
        settings.motor[1].pins.push(0);
        assert_eq!(
            KeyMaterial::try_from(settings).unwrap_err(),
            LorenzError::InvalidKeyMaterial(KeyFault::PatternLength {
                wheel: WheelId::motor(1),
                expected: 37,
                found: 38,
            })
        );
    }

    #[test]
    fn test_settings_debug_redacts_pins() {
        let settings = KeyMaterial::try_from_fn(patterned).unwrap().settings();
        let text = format!("{:?}", settings);
        assert!(text.contains("REDACTED"));
        assert!(text.contains("indicator: 30"));
        assert!(!text.contains("pins: ["));
    }
}
