//! # Test de Primalidad Miller-Rabin
//! src/math/primality.rs
//!
//! Dos modos:
//! - **Determinista**: prueba todos los testigos `2..=3936`. Bajo la
//!   Hipótesis de Riemann Generalizada el menor testigo de cualquier
//!   compuesto `n < 2^64` es a lo sumo `ceil(2 * ln(2^64)^2) = 3936`.
//! - **Probabilístico**: prueba los testigos `2..=40`. Para un compuesto
//!   fijo la probabilidad de falso positivo es a lo sumo `4^-40`, y es
//!   unas 100 veces más rápido que el modo determinista.
//!
//! Para `n` menor o igual al límite de testigos el test se vuelve una
//! verificación exhaustiva con todos los testigos `2..n`, lo cual sigue
//! siendo correcto.

use super::modular::{mod_mul, mod_pow};
use serde::Serialize;

/// Testigo máximo necesario para n < 2^64 (bajo GRH)
pub const DETERMINISTIC_WITNESS_LIMIT: u64 = 3936;

/// Testigo máximo del modo rápido
pub const PROBABILISTIC_WITNESS_LIMIT: u64 = 40;

/// Modo del test de primalidad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimalityMode {
    /// Correcto para todo n < 2^64 asumiendo GRH
    Deterministic,

    /// Error acotado por 4^-40, usado por defecto en los consumidores
    #[default]
    Probabilistic,
}

impl PrimalityMode {
    pub fn from_deterministic(deterministic: bool) -> Self {
        if deterministic {
            PrimalityMode::Deterministic
        } else {
            PrimalityMode::Probabilistic
        }
    }

    /// Último testigo que se prueba en este modo
    pub fn witness_limit(&self) -> u64 {
        match self {
            PrimalityMode::Deterministic => DETERMINISTIC_WITNESS_LIMIT,
            PrimalityMode::Probabilistic => PROBABILISTIC_WITNESS_LIMIT,
        }
    }
}

/// Una ronda de Miller-Rabin con el testigo `a`
///
/// Requiere `n` impar, `2^k * m == n - 1` con `m` impar, y `1 < a < n - 1`.
/// Retorna `false` si `a` demuestra que `n` es compuesto.
pub fn single_witness_passes(a: u64, k: u64, m: u64, n: u64) -> bool {
    let mut b = mod_pow(a, m, n);

    if b == 1 {
        return true;
    }

    for _ in 0..k {
        if b == n - 1 {
            return true;
        }
        if b == 1 {
            // raíz cuadrada no trivial de 1
            return false;
        }
        b = mod_mul(b, b, n);
    }

    false
}

/// Verifica si `n` es primo
pub fn is_prime(n: u64, mode: PrimalityMode) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    // n >= 5 impar: escribir n - 1 = 2^k * m con m impar
    let mut k = 1;
    let mut m = (n - 1) >> 1;
    while m & 1 == 0 {
        k += 1;
        m >>= 1;
    }

    let max_witness = (n - 1).min(mode.witness_limit());
    (2..=max_witness).all(|a| single_witness_passes(a, k, m, n))
}
