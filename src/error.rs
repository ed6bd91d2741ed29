//! # Errores del Pipeline
//! src/error.rs
//!
//! Taxonomía de errores que pueden terminar una corrida. Las condiciones
//! esperadas de la cola (timeout, cerrada) no viven aquí: son señales de
//! control locales de cada worker (ver `jobs::queue`).

use std::fmt;
use thiserror::Error;

/// Rol de un worker, usado para identificarlo en logs y errores
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    Producer,
    Consumer,
}

/// Identidad de un worker: rol + índice
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WorkerId {
    pub role: WorkerRole,
    pub index: usize,
}

impl WorkerId {
    pub fn producer(index: usize) -> Self {
        Self { role: WorkerRole::Producer, index }
    }

    pub fn consumer(index: usize) -> Self {
        Self { role: WorkerRole::Consumer, index }
    }

    /// Nombre del thread del sistema operativo
    pub fn thread_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            WorkerRole::Producer => write!(f, "producer-{}", self.index),
            WorkerRole::Consumer => write!(f, "consumer-{}", self.index),
        }
    }
}

/// Errores de una corrida
#[derive(Error, Debug)]
pub enum Error {
    /// Configuración inválida, detectada antes de lanzar cualquier worker
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Fallo al crear o destruir el recurso nombrado del canal
    #[error("Resource error on channel '{name}': {message}")]
    Resource { name: String, message: String },

    /// No se pudo lanzar el thread de un worker
    #[error("Failed to spawn {worker}: {source}")]
    Spawn {
        worker: WorkerId,
        #[source]
        source: std::io::Error,
    },

    /// El canal se cerró mientras un productor todavía tenía jobs
    #[error("{worker} found the channel closed before pushing all of its jobs")]
    ChannelClosed { worker: WorkerId },

    /// El thread del worker hizo panic
    #[error("{worker} panicked: {message}")]
    WorkerPanicked { worker: WorkerId, message: String },

    /// No se pudo escribir un resultado o el reporte
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn resource(name: &str, message: impl fmt::Display) -> Self {
        Error::Resource {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

/// Alias de Result para las operaciones del crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_id_display() {
        assert_eq!(WorkerId::producer(0).to_string(), "producer-0");
        assert_eq!(WorkerId::consumer(7).thread_name(), "consumer-7");
    }

    #[test]
    fn test_error_display() {
        let err = Error::Configuration("capacity must be >= 1".to_string());
        assert_eq!(err.to_string(), "Configuration error: capacity must be >= 1");

        let err = Error::resource("/q", "already exists");
        assert_eq!(err.to_string(), "Resource error on channel '/q': already exists");

        let err = Error::ChannelClosed { worker: WorkerId::producer(2) };
        assert!(err.to_string().starts_with("producer-2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Output(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
