//! # Núcleo Numérico
//!
//! Aritmética modular sin overflow y el test de primalidad de Miller-Rabin
//! que ejecuta cada consumidor por job.

pub mod modular;
pub mod primality;

pub use modular::{mod_add, mod_mul, mod_pow};
pub use primality::{is_prime, single_witness_passes, PrimalityMode};
