//! # Fuente de Candidatos
//! src/workers/source.rs
//!
//! De dónde saca cada productor sus números. En producción es aleatorio;
//! con `--seed` es reproducible; en tests puede ser una lista fija.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fuente de enteros impares de 64 bits
pub trait CandidateSource {
    /// Retorna el siguiente candidato, siempre impar
    fn next_candidate(&mut self) -> u64;
}

/// Números aleatorios del RNG del thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl CandidateSource for ThreadRandom {
    fn next_candidate(&mut self) -> u64 {
        rand::thread_rng().gen::<u64>() | 1
    }
}

/// Números aleatorios reproducibles a partir de una semilla
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CandidateSource for SeededRandom {
    fn next_candidate(&mut self) -> u64 {
        self.rng.gen::<u64>() | 1
    }
}

/// Lista fija de valores, recorrida en ciclo
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<u64>,
    next: usize,
}

impl SequenceSource {
    /// Una lista vacía produce siempre 1
    pub fn new(values: Vec<u64>) -> Self {
        Self { values, next: 0 }
    }
}

impl CandidateSource for SequenceSource {
    fn next_candidate(&mut self) -> u64 {
        if self.values.is_empty() {
            return 1;
        }
        let value = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        value | 1
    }
}

/// Fuente por defecto del productor `producer_id`
///
/// Con semilla, el productor `i` usa `seed + i` para que cada uno genere
/// una secuencia distinta pero reproducible.
pub fn source_for(seed: Option<u64>, producer_id: usize) -> Box<dyn CandidateSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed.wrapping_add(producer_id as u64))),
        None => Box::new(ThreadRandom),
    }
}

impl<S: CandidateSource + ?Sized> CandidateSource for Box<S> {
    fn next_candidate(&mut self) -> u64 {
        (**self).next_candidate()
    }
}
