//! # Configuración
//! src/config.rs
//!
//! Configuración de una corrida con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./prime_jobs -p 4 -c 2 -j 100 -s 16 -n /mi_canal
//! ./prime_jobs -r -n /mi_canal        # borra un canal huérfano
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PRIME_JOBS_PRODUCERS=8 PRIME_JOBS_SEED=42 ./prime_jobs --json-report
//! ```

use crate::error::{Error, Result};
use crate::jobs::lease;
use clap::Parser;
use std::path::PathBuf;

/// Configuración del pipeline de primos
#[derive(Debug, Clone, Parser)]
#[command(name = "prime_jobs")]
#[command(about = "Productores y consumidores que verifican primalidad sobre una cola acotada")]
#[command(version = "0.1.0")]
pub struct Config {
    // === Workers ===

    /// Número de productores
    #[arg(short, long, default_value = "3", env = "PRIME_JOBS_PRODUCERS")]
    pub producers: usize,

    /// Número de consumidores
    #[arg(short, long, default_value = "3", env = "PRIME_JOBS_CONSUMERS")]
    pub consumers: usize,

    /// Jobs que encola cada productor
    #[arg(short, long, default_value = "10", env = "PRIME_JOBS_JOBS")]
    pub jobs: u64,

    // === Canal ===

    /// Nombre del canal (empieza con /)
    #[arg(short = 'n', long = "queue-name", default_value = "/prime_jobs_mq", env = "PRIME_JOBS_QUEUE_NAME")]
    pub queue_name: String,

    /// Capacidad máxima del canal
    #[arg(short = 's', long, default_value = "10", env = "PRIME_JOBS_CAPACITY")]
    pub capacity: usize,

    /// Solo borra el canal con ese nombre y termina
    #[arg(short, long)]
    pub remove: bool,

    /// Directorio de los leases de canales (por defecto el temporal del sistema)
    #[arg(long = "registry-dir", env = "PRIME_JOBS_REGISTRY_DIR")]
    pub registry_dir: Option<PathBuf>,

    // === Consumidores ===

    /// Intervalo de sondeo de los consumidores en milisegundos
    #[arg(long = "poll-ms", default_value = "100", env = "PRIME_JOBS_POLL_MS")]
    pub poll_ms: u64,

    /// Usa todos los testigos de Miller-Rabin hasta 3936
    #[arg(long)]
    pub deterministic: bool,

    // === Productores ===

    /// Semilla base; el productor i usa semilla + i
    #[arg(long, env = "PRIME_JOBS_SEED")]
    pub seed: Option<u64>,

    // === Salida ===

    /// Imprime un resumen JSON de la corrida al terminar
    #[arg(long = "json-report")]
    pub json_report: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Directorio efectivo de leases
    pub fn registry_dir(&self) -> PathBuf {
        self.registry_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Valida la configuración
    ///
    /// Cero productores es válido: la corrida termina sin trabajo.
    pub fn validate(&self) -> Result<()> {
        lease::validate_name(&self.queue_name)?;

        // En modo --remove solo importa el nombre
        if self.remove {
            return Ok(());
        }

        if self.consumers == 0 {
            return Err(Error::Configuration("Consumers must be >= 1".to_string()));
        }
        if self.capacity == 0 {
            return Err(Error::Configuration("Queue capacity must be >= 1".to_string()));
        }
        if self.poll_ms == 0 {
            return Err(Error::Configuration("Poll interval must be > 0".to_string()));
        }
        if (self.producers as u64).checked_mul(self.jobs).is_none() {
            return Err(Error::Configuration("Total job count overflows u64".to_string()));
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            producers: 3,
            consumers: 3,
            jobs: 10,
            queue_name: "/prime_jobs_mq".to_string(),
            capacity: 10,
            remove: false,
            registry_dir: None,
            poll_ms: 100,
            deterministic: false,
            seed: None,
            json_report: false,
        }
    }
}
