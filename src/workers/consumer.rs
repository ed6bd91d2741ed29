//! # Consumidor
//! src/workers/consumer.rs
//!
//! Desencola jobs, verifica si el payload es primo y reporta los primos.
//!
//! ## Protocolo de terminación
//!
//! El consumidor espera jobs con un timeout corto para poder revisar la
//! señal de parada. Solo termina cuando:
//! 1. vio la señal levantada, y
//! 2. un `pop` posterior encontró la cola vacía.
//!
//! La señal se levanta después de que todos los productores terminaron, así
//! que a partir de (1) la cola solo puede vaciarse. El `pop` de (2) se hace
//! con timeout cero: el consumidor sale a lo sumo un intervalo de polling
//! después de que la cola quedó vacía, sin perder jobs encolados antes de
//! la señal.

use crate::error::{Result, WorkerId};
use crate::jobs::{Job, JobKind, JobQueue, PopError, StopSignal};
use crate::math::{is_prime, PrimalityMode};
use crate::metrics::PipelineStats;
use crate::workers::sink::{PrimeFound, ResultSink};
use crate::workers::WorkerReport;
use std::time::Duration;

/// Intervalo de polling por defecto
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Parámetros de un consumidor
#[derive(Debug, Clone, Copy)]
pub struct ConsumerOptions {
    pub mode: PrimalityMode,
    pub poll_interval: Duration,
}

impl Default for ConsumerOptions {
    fn default() -> Self {
        Self {
            mode: PrimalityMode::Probabilistic,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Loop principal del consumidor
///
/// Un error del sink termina a este consumidor y se reporta como su
/// resultado; los demás siguen drenando la cola.
pub fn consumer_loop(
    id: usize,
    queue: &JobQueue,
    stop: &StopSignal,
    options: &ConsumerOptions,
    sink: &dyn ResultSink,
    stats: &PipelineStats,
) -> Result<WorkerReport> {
    let worker = WorkerId::consumer(id);
    let _active = stats.worker_started();
    tracing::debug!(%worker, mode = ?options.mode, "consumer started");

    let mut report = WorkerReport {
        worker,
        jobs: 0,
        primes: 0,
    };
    let mut stop_observed = false;

    loop {
        let timeout = if stop_observed {
            Duration::ZERO
        } else {
            options.poll_interval
        };

        match queue.pop_timeout(timeout) {
            Ok(job) => {
                if evaluate(id, &job, options.mode, sink, stats, &mut report)? {
                    tracing::trace!(%worker, value = job.payload, "prime found");
                }
            }
            // Cola vacía después de ver la señal: no quedan jobs
            Err(PopError::TimedOut) if stop_observed => break,
            Err(PopError::TimedOut) => stop_observed = stop.is_set(),
            Err(PopError::Closed) => {
                tracing::debug!(%worker, "channel closed");
                break;
            }
        }
    }

    tracing::debug!(%worker, jobs = report.jobs, primes = report.primes, "consumer exiting");
    Ok(report)
}

/// Evalúa un job. Retorna `true` si el payload es primo.
fn evaluate(
    consumer_id: usize,
    job: &Job,
    mode: PrimalityMode,
    sink: &dyn ResultSink,
    stats: &PipelineStats,
    report: &mut WorkerReport,
) -> Result<bool> {
    if job.kind == JobKind::End {
        tracing::debug!(worker = %report.worker, producer = job.producer_id, "ignoring end sentinel");
        return Ok(false);
    }

    tracing::trace!(worker = %report.worker, value = job.payload, "---job---");
    stats.record_consumed();
    report.jobs += 1;

    if !is_prime(job.payload, mode) {
        return Ok(false);
    }

    sink.report(&PrimeFound {
        value: job.payload,
        producer_id: job.producer_id,
        consumer_id,
    })?;
    stats.record_prime();
    report.primes += 1;

    Ok(true)
}
