//! Random key generation.
//!
//! Produces fresh wheel patterns and indicators with the canonical SZ40
//! teeth counts. A wheel whose pins are all equal would contribute a
//! constant to the keystream, so such draws are discarded and redrawn.

use rand::rngs::OsRng;
use rand::Rng;
use tracing::debug;

use crate::key::KeyMaterial;
use crate::wheel::{Wheel, WheelId};

/// Generates key material from the operating system's secure RNG.
///
/// # Examples
///
/// ```
/// let key = lorenz_sz40::keygen::generate();
/// assert!(key.check_degenerate().is_ok());
/// ```
pub fn generate() -> KeyMaterial {
    generate_with_rng(&mut OsRng)
}

/// Generates key material from a caller-supplied RNG.
///
/// Every pin is an independent fair bit and every indicator is uniform over
/// its wheel's positions.
///
/// # Parameters
/// - `rng`: Source of randomness. Seeded generators give reproducible keys.
pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R) -> KeyMaterial {
    let chi = std::array::from_fn(|i| random_wheel(rng, WheelId::chi(i)));
    let psi = std::array::from_fn(|i| random_wheel(rng, WheelId::psi(i)));
    let motor = std::array::from_fn(|i| random_wheel(rng, WheelId::motor(i)));
    debug!("generated new wheel patterns and indicators");
    KeyMaterial::from_wheels(chi, psi, motor)
}

fn random_wheel<R: Rng + ?Sized>(rng: &mut R, id: WheelId) -> Wheel {
    let teeth = id.teeth();
    let pins = loop {
        let pins: Vec<u8> = (0..teeth).map(|_| rng.gen::<bool>() as u8).collect();
        if pins.contains(&0) && pins.contains(&1) {
            break pins;
        }
        debug!(wheel = %id, "discarding degenerate pin draw");
    };
    Wheel::from_valid(pins, rng.gen_range(0..teeth))
}
