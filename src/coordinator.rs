//! # Coordinador
//! src/coordinator.rs
//!
//! Dueño del canal y de la señal de parada durante toda la corrida:
//!
//! 1. crea el canal (lease nombrado + cola acotada) y la señal
//! 2. lanza los consumidores y luego los productores
//! 3. espera a todos los productores
//! 4. levanta la señal de parada
//! 5. espera a todos los consumidores
//! 6. destruye el canal
//! 7. retorna el primer error de un worker, si hubo alguno
//!
//! Los pasos 4 a 6 se ejecutan siempre, aunque algún worker haya fallado.
//! Los workers son threads con scope: solo toman referencias prestadas a la
//! cola y a la señal, y no pueden sobrevivir al coordinador.

use crate::config::Config;
use crate::error::{Error, Result, WorkerId};
use crate::jobs::{ChannelLease, JobQueue, StopSignal};
use crate::math::PrimalityMode;
use crate::metrics::{PipelineStats, StatsSnapshot};
use crate::workers::{
    consumer_loop, producer_loop, source_for, CandidateSource, ConsumerOptions, ResultSink,
    WorkerReport, DEFAULT_POLL_INTERVAL,
};
use serde::Serialize;
use std::any::Any;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ScopedJoinHandle};
use std::time::Duration;

/// Canal por defecto
pub const DEFAULT_QUEUE_NAME: &str = "/prime_jobs_mq";

/// Configuración de una corrida
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub producers: usize,
    pub consumers: usize,
    pub jobs_per_producer: u64,
    pub capacity: usize,
    pub queue_name: String,
    pub registry_dir: PathBuf,
    pub poll_interval: Duration,
    pub mode: PrimalityMode,
    /// Semilla base de los productores; `None` usa el RNG del thread
    pub seed: Option<u64>,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            producers: 3,
            consumers: 3,
            jobs_per_producer: 10,
            capacity: 10,
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            registry_dir: std::env::temp_dir(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            mode: PrimalityMode::Probabilistic,
            seed: None,
        }
    }
}

impl CoordinatorSettings {
    /// Crea la configuración desde el Config principal
    pub fn from_config(config: &Config) -> Self {
        Self {
            producers: config.producers,
            consumers: config.consumers,
            jobs_per_producer: config.jobs,
            capacity: config.capacity,
            queue_name: config.queue_name.clone(),
            registry_dir: config.registry_dir(),
            poll_interval: Duration::from_millis(config.poll_ms),
            mode: PrimalityMode::from_deterministic(config.deterministic),
            seed: config.seed,
        }
    }

    /// Total de jobs que se van a producir
    pub fn total_jobs(&self) -> u64 {
        self.producers as u64 * self.jobs_per_producer
    }
}

/// Resumen de una corrida exitosa
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub queue_name: String,
    pub producers: usize,
    pub consumers: usize,
    pub jobs_per_producer: u64,
    pub capacity: usize,
    pub mode: PrimalityMode,
    pub stats: StatsSnapshot,
    pub workers: Vec<WorkerReport>,
}

pub struct Coordinator {
    settings: CoordinatorSettings,
}

impl Coordinator {
    pub fn new(settings: CoordinatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Ejecuta la corrida con la fuente de candidatos por defecto
    pub fn run(&self, sink: &dyn ResultSink) -> Result<RunReport> {
        let seed = self.settings.seed;
        self.run_with(move |producer_id| source_for(seed, producer_id), sink)
    }

    /// Ejecuta la corrida completa
    ///
    /// `make_source` se llama dentro del thread de cada productor con su id.
    pub fn run_with<F, S>(&self, make_source: F, sink: &dyn ResultSink) -> Result<RunReport>
    where
        F: Fn(usize) -> S + Sync,
        S: CandidateSource,
    {
        let settings = &self.settings;

        if settings.consumers == 0 {
            return Err(Error::Configuration("consumers must be >= 1".to_string()));
        }

        // 1. Crear el canal. Si falla no se lanza nada.
        let queue = JobQueue::new(settings.capacity)?;
        let lease = ChannelLease::acquire(&settings.registry_dir, &settings.queue_name, settings.capacity)?;
        let stop = StopSignal::new();
        let stats = PipelineStats::new();
        let options = ConsumerOptions {
            mode: settings.mode,
            poll_interval: settings.poll_interval,
        };
        let live_consumers = AtomicUsize::new(settings.consumers);
        let shared = Shared {
            queue: &queue,
            stop: &stop,
            live_consumers: &live_consumers,
        };

        tracing::info!(
            channel = %settings.queue_name,
            producers = settings.producers,
            consumers = settings.consumers,
            jobs_per_producer = settings.jobs_per_producer,
            capacity = settings.capacity,
            mode = ?settings.mode,
            "starting run"
        );

        let mut outcome = Outcome::default();

        thread::scope(|scope| {
            // 2. Consumidores primero, para que la cola empiece a drenarse
            let mut consumers = Vec::with_capacity(settings.consumers);
            for index in 0..settings.consumers {
                let worker = WorkerId::consumer(index);
                let (queue, stop, stats, options) = (&queue, &stop, &stats, &options);
                let spawned = thread::Builder::new()
                    .name(worker.thread_name())
                    .spawn_scoped(scope, move || {
                        let _exit = ConsumerExit(shared);
                        consumer_loop(index, queue, stop, options, sink, stats)
                    });

                match spawned {
                    Ok(handle) => consumers.push((worker, handle)),
                    Err(source) => {
                        outcome.fail(Error::Spawn { worker, source });
                        shared.consumers_gone(settings.consumers - index);
                        break;
                    }
                }
            }

            let mut producers = Vec::with_capacity(settings.producers);
            for index in 0..settings.producers {
                let worker = WorkerId::producer(index);
                let (queue, stats, make_source) = (&queue, &stats, &make_source);
                let jobs = settings.jobs_per_producer;
                let spawned = thread::Builder::new()
                    .name(worker.thread_name())
                    .spawn_scoped(scope, move || {
                        let mut source = make_source(index);
                        producer_loop(index, jobs, queue, &mut source, stats)
                    });

                match spawned {
                    Ok(handle) => producers.push((worker, handle)),
                    Err(source) => {
                        outcome.fail(Error::Spawn { worker, source });
                        break;
                    }
                }
            }

            // 3. Esperar a todos los productores
            for (worker, handle) in producers {
                outcome.collect(worker, handle);
            }

            // 4. Ya no se van a encolar más jobs
            stop.set();
            tracing::info!(pushed = stats.jobs_pushed(), "producers finished, stop signal raised");

            // 5. Esperar a que los consumidores drenen la cola
            for (worker, handle) in consumers {
                outcome.collect(worker, handle);
            }
        });

        // 6. Destruir el canal
        queue.close();
        let released = lease.release();

        let snapshot = stats.snapshot();
        tracing::info!(
            consumed = snapshot.jobs_consumed,
            primes = snapshot.primes_found,
            elapsed_ms = snapshot.elapsed_ms,
            "all workers exited, channel closed"
        );

        // 7. Primer error de un worker; si no hubo, el de la destrucción
        if let Some(err) = outcome.failure {
            if let Err(release_err) = released {
                tracing::error!(error = %release_err, "failed to remove channel");
            }
            return Err(err);
        }
        released?;

        Ok(RunReport {
            queue_name: settings.queue_name.clone(),
            producers: settings.producers,
            consumers: settings.consumers,
            jobs_per_producer: settings.jobs_per_producer,
            capacity: settings.capacity,
            mode: settings.mode,
            stats: snapshot,
            workers: outcome.reports,
        })
    }
}

/// Estado que los consumidores comparten con el coordinador
#[derive(Clone, Copy)]
struct Shared<'a> {
    queue: &'a JobQueue,
    stop: &'a StopSignal,
    live_consumers: &'a AtomicUsize,
}

impl Shared<'_> {
    /// Descuenta `count` consumidores que ya no van a drenar la cola
    ///
    /// Si se van todos antes de la señal de parada, nadie volverá a sacar
    /// jobs: se cierra la cola para que los productores bloqueados fallen
    /// con `ChannelClosed` en vez de esperar para siempre.
    fn consumers_gone(&self, count: usize) {
        if count == 0 {
            return;
        }
        let before = self.live_consumers.fetch_sub(count, Ordering::AcqRel);
        if before == count && !self.stop.is_set() {
            tracing::warn!("all consumers exited before the producers finished, closing channel");
            self.queue.close();
        }
    }
}

/// Descuenta al consumidor al terminar su thread, incluso con panic
struct ConsumerExit<'a>(Shared<'a>);

impl Drop for ConsumerExit<'_> {
    fn drop(&mut self) {
        self.0.consumers_gone(1);
    }
}

/// Resultados recolectados al hacer join
#[derive(Default)]
struct Outcome {
    reports: Vec<WorkerReport>,
    failure: Option<Error>,
}

impl Outcome {
    fn fail(&mut self, err: Error) {
        tracing::error!(error = %err, "worker failed");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
    }

    fn collect(&mut self, worker: WorkerId, handle: ScopedJoinHandle<'_, Result<WorkerReport>>) {
        match handle.join() {
            Ok(Ok(report)) => self.reports.push(report),
            Ok(Err(err)) => self.fail(err),
            Err(payload) => self.fail(Error::WorkerPanicked {
                worker,
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
