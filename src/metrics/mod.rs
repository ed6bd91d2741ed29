//! # Sistema de Métricas
//!
//! Contadores de jobs encolados, consumidos y primos encontrados.

pub mod collector;

pub use collector::{ActiveWorkerGuard, PipelineStats, StatsSnapshot};
