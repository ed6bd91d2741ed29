//! # Workers
//!
//! Los dos lados del pipeline y sus colaboradores:
//!
//! - `producer`: genera jobs y los encola
//! - `consumer`: desencola, verifica primalidad y reporta
//! - `source`: de dónde salen los candidatos
//! - `sink`: a dónde van los primos encontrados

pub mod consumer;
pub mod producer;
pub mod sink;
pub mod source;

use crate::error::WorkerId;
use serde::Serialize;

pub use consumer::{consumer_loop, ConsumerOptions, DEFAULT_POLL_INTERVAL};
pub use producer::producer_loop;
pub use sink::{LineSink, MemorySink, PrimeFound, ResultSink};
pub use source::{source_for, CandidateSource, SeededRandom, SequenceSource, ThreadRandom};

/// Resultado exitoso de un worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker: WorkerId,

    /// Jobs encolados (productor) o evaluados (consumidor)
    pub jobs: u64,

    /// Primos encontrados; siempre 0 para productores
    pub primes: u64,
}
