//! # Productor
//! src/workers/producer.rs
//!
//! Genera una cantidad fija de jobs y los encola. Si la cola está llena el
//! productor se bloquea hasta que un consumidor libere espacio.

use crate::error::{Error, Result, WorkerId};
use crate::jobs::{Job, JobQueue, PushError};
use crate::metrics::PipelineStats;
use crate::workers::source::CandidateSource;
use crate::workers::WorkerReport;

/// Loop principal del productor
///
/// Retorna `Error::ChannelClosed` si la cola se cierra antes de encolar
/// todos los jobs. No se reintenta.
pub fn producer_loop(
    id: usize,
    job_count: u64,
    queue: &JobQueue,
    source: &mut dyn CandidateSource,
    stats: &PipelineStats,
) -> Result<WorkerReport> {
    let worker = WorkerId::producer(id);
    let _active = stats.worker_started();
    tracing::debug!(%worker, job_count, "producer started");

    for pushed in 0..job_count {
        let job = Job::data(id, source.next_candidate());

        if let Err(PushError::Closed(job)) = queue.push(job) {
            tracing::error!(%worker, pushed, payload = job.payload, "could not send to queue: channel closed");
            return Err(Error::ChannelClosed { worker });
        }

        stats.record_pushed();
        tracing::trace!(%worker, payload = job.payload, "job pushed");
    }

    tracing::debug!(%worker, "producer exiting");
    Ok(WorkerReport {
        worker,
        jobs: job_count,
        primes: 0,
    })
}
