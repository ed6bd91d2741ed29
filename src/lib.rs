//! # Prime Jobs
//! src/lib.rs
//!
//! Pipeline productor/consumidor para demostrar conceptos de sistemas
//! operativos: concurrencia, sincronización y manejo de recursos.
//!
//! Varios productores encolan números impares aleatorios en una cola
//! acotada; varios consumidores los sacan y verifican su primalidad con
//! Miller-Rabin. Un coordinador crea el canal, espera a los productores,
//! avisa el fin con una señal de parada y espera a que los consumidores
//! drenen la cola antes de destruirlo.
//!
//! ## Arquitectura
//!
//! - `math`: aritmética modular sin overflow y test de Miller-Rabin
//! - `jobs`: job, cola acotada, señal de parada y lease del canal
//! - `workers`: loops de productor y consumidor, fuentes y sinks
//! - `metrics`: contadores de la corrida
//! - `coordinator`: ciclo de vida completo de una corrida
//! - `config`: CLI y variables de entorno
//! - `logging`: subscriber de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use prime_jobs::coordinator::{Coordinator, CoordinatorSettings};
//! use prime_jobs::workers::LineSink;
//!
//! let coordinator = Coordinator::new(CoordinatorSettings::default());
//! let report = coordinator.run(&LineSink::stdout()).expect("run failed");
//! println!("{} primes", report.stats.primes_found);
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod math;
pub mod metrics;
pub mod workers;

pub use error::{Error, Result};
