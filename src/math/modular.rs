//! # Aritmética Modular
//! src/math/modular.rs
//!
//! Suma, multiplicación y exponenciación módulo `m` para cualquier `m` de
//! 64 bits. Ninguna operación intermedia excede `u64::MAX`, así que no se
//! necesita aritmética de 128 bits.
//!
//! Todas las funciones exigen `m >= 1`.

/// Suma modular: (a + b) % m sin overflow
///
/// En vez de sumar directamente, compara `b` contra la distancia `m - a`
/// que le queda a `a` para "dar la vuelta".
///
/// # Panics
/// Si `m == 0` (división por cero al reducir).
pub fn mod_add(a: u64, b: u64, m: u64) -> u64 {
    let a = reduce(a, m);
    let b = reduce(b, m);
    let gap = m - a;

    if gap > b {
        a + b
    } else {
        // gap <= b: la suma da la vuelta (o cae justo en m)
        b - gap
    }
}

/// Reduce `x` módulo `m`, evitando la división si ya está reducido
#[inline]
fn reduce(x: u64, m: u64) -> u64 {
    if x < m {
        x
    } else {
        x % m
    }
}

/// Multiplicación modular: (a * b) % m
///
/// Double-and-add sobre los bits de `b`: O(log b) llamadas a `mod_add`.
///
/// # Panics
/// Si `m == 0`.
pub fn mod_mul(mut a: u64, mut b: u64, m: u64) -> u64 {
    let mut result = 0;
    a %= m;

    while b > 0 {
        if b & 1 == 1 {
            result = mod_add(result, a, m);
        }
        a = mod_add(a, a, m);
        b >>= 1;
    }

    result
}

/// Exponenciación modular: (base^exp) % m
///
/// Square-and-multiply sobre los bits de `exp`. El acumulador arranca en
/// `1 % m`, por lo que `mod_pow(x, 0, m) == 1` para todo `m > 1` y el
/// resultado con `m == 1` siempre es 0.
///
/// # Panics
/// Si `m == 0`.
pub fn mod_pow(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1 % m;
    base %= m;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, m);
        }
        base = mod_mul(base, base, m);
        exp >>= 1;
    }

    result
}
