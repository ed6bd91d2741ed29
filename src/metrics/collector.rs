//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Contadores de una corrida, compartidos por todos los workers.
//! Son atómicos para no agregar contención a la cola.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Contadores thread-safe del pipeline
#[derive(Debug)]
pub struct PipelineStats {
    /// Jobs encolados por los productores
    jobs_pushed: AtomicU64,

    /// Jobs sacados de la cola y evaluados
    jobs_consumed: AtomicU64,

    /// Primos encontrados
    primes_found: AtomicU64,

    /// Workers ejecutándose actualmente
    active_workers: AtomicU64,

    start_time: Instant,
}

/// Foto de las métricas en un instante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub jobs_pushed: u64,
    pub jobs_consumed: u64,
    pub primes_found: u64,
    pub active_workers: u64,
    pub elapsed_ms: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            jobs_pushed: AtomicU64::new(0),
            jobs_consumed: AtomicU64::new(0),
            primes_found: AtomicU64::new(0),
            active_workers: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_pushed(&self) {
        self.jobs_pushed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_consumed(&self) {
        self.jobs_consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prime(&self) {
        self.primes_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Marca un worker como activo. Se deshace al descartar el guard.
    pub fn worker_started(&self) -> ActiveWorkerGuard<'_> {
        self.active_workers.fetch_add(1, Ordering::Relaxed);
        ActiveWorkerGuard { stats: self }
    }

    pub fn jobs_pushed(&self) -> u64 {
        self.jobs_pushed.load(Ordering::Relaxed)
    }

    pub fn jobs_consumed(&self) -> u64 {
        self.jobs_consumed.load(Ordering::Relaxed)
    }

    pub fn primes_found(&self) -> u64 {
        self.primes_found.load(Ordering::Relaxed)
    }

    pub fn active_workers(&self) -> u64 {
        self.active_workers.load(Ordering::Relaxed)
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            jobs_pushed: self.jobs_pushed(),
            jobs_consumed: self.jobs_consumed(),
            primes_found: self.primes_found(),
            active_workers: self.active_workers(),
            elapsed_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrementa `active_workers` al salir del worker, incluso con panic
pub struct ActiveWorkerGuard<'a> {
    stats: &'a PipelineStats,
}

impl Drop for ActiveWorkerGuard<'_> {
    fn drop(&mut self) {
        self.stats.active_workers.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_counters() {
        let stats = PipelineStats::new();
        stats.record_pushed();
        stats.record_pushed();
        stats.record_consumed();
        stats.record_prime();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.jobs_pushed, 2);
        assert_eq!(snapshot.jobs_consumed, 1);
        assert_eq!(snapshot.primes_found, 1);
    }

    #[test]
    fn test_active_worker_guard() {
        let stats = PipelineStats::new();
        {
            let _a = stats.worker_started();
            let _b = stats.worker_started();
            assert_eq!(stats.active_workers(), 2);
        }
        assert_eq!(stats.active_workers(), 0);
    }

    #[test]
    fn test_concurrent_updates() {
        let stats = PipelineStats::new();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        stats.record_consumed();
                    }
                });
            }
        });
        assert_eq!(stats.jobs_consumed(), 8_000);
    }

    #[test]
    fn test_snapshot_serialization() {
        let stats = PipelineStats::new();
        stats.record_prime();
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["primes_found"], 1);
        assert!(json.get("elapsed_ms").is_some());
    }
}
