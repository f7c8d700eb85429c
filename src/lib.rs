//! Lorenz SZ40 teleprinter cipher machine.
//!
//! The SZ40 enciphers 5-bit ITA2 teleprinter characters by XOR with a
//! keystream produced by twelve pinwheels. Five chi wheels step every
//! character; five psi wheels step together only when the two motor wheels
//! allow it. That irregular psi motion is what makes the keystream
//! non-periodic.
//!
//! # Architecture
//!
//! ```text
//! Wheel        (pin ring + offset)
//!     ↕ 12 wheels: chi ×5, psi ×5, motor ×2
//! KeyMaterial  (patterns + indicators; keygen or validated load)
//!     ↕ cloned per session
//! StepEngine   (motion rule) ──► combiner (chi ⊕ psi)
//!     ↕
//! Encryptor / Decryptor  (baudot codec + keystream XOR)
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt a message:
//!
//! ```
//! use lorenz_sz40::{keygen, Decryptor, Encryptor, MachineConfig};
//!
//! let key = keygen::generate();
//! let config = MachineConfig::default();
//!
//! let mut sender = Encryptor::new(&key, &config);
//! let cipher = sender.encrypt_str("SUPPLY 40 TONS").unwrap();
//!
//! let mut receiver = Decryptor::new(&key, &config);
//! assert_eq!(receiver.decrypt_units(&cipher).unwrap(), "SUPPLY 40 TONS");
//! ```
//!
//! Keys travel through any serde format:
//!
//! ```
//! use lorenz_sz40::{keygen, KeyMaterial};
//!
//! let key = keygen::generate();
//! let settings = key.settings();
//! assert_eq!(KeyMaterial::try_from(settings).unwrap(), key);
//! ```

#![deny(clippy::all)]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod baudot;
pub mod combiner;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod keygen;
mod machine;
pub mod wheel;

pub use config::{MachineConfig, ShiftStepping};
pub use engine::{Motion, StepEngine};
pub use error::{KeyFault, LorenzError};
pub use key::{KeyMaterial, KeySettings, WheelSettings};
pub use machine::{crypt_tape, decrypt, encrypt, Decryptor, Encryptor};
pub use wheel::{Wheel, WheelGroup, WheelId};
