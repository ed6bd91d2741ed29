//! # Job
//! src/jobs/job.rs
//!
//! Unidad de trabajo que viaja por la cola: un candidato impar de 64 bits.

use serde::Serialize;

/// Tipo de job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Candidato a verificar
    Data,

    /// Centinela "fin de datos". El coordinador termina a los consumidores
    /// con `StopSignal`, así que este tipo nunca se encola en el flujo
    /// normal; los consumidores lo ignoran si llega.
    End,
}

/// Job inmutable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Productor que lo generó (solo para diagnóstico)
    pub producer_id: usize,

    pub kind: JobKind,

    /// Valor a verificar, siempre impar en un job `Data`
    pub payload: u64,
}

impl Job {
    /// Crea un job de datos. Fuerza el bit bajo para que el payload sea impar.
    pub fn data(producer_id: usize, payload: u64) -> Self {
        Self {
            producer_id,
            kind: JobKind::Data,
            payload: payload | 1,
        }
    }

    /// Crea un centinela de fin
    pub fn end(producer_id: usize) -> Self {
        Self {
            producer_id,
            kind: JobKind::End,
            payload: 0,
        }
    }

    pub fn is_data(&self) -> bool {
        self.kind == JobKind::Data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_job_is_odd() {
        let job = Job::data(1, 10);
        assert_eq!(job.payload, 11);
        assert_eq!(job.producer_id, 1);
        assert!(job.is_data());

        let job = Job::data(0, 7);
        assert_eq!(job.payload, 7);
    }

    #[test]
    fn test_end_job() {
        let job = Job::end(3);
        assert_eq!(job.kind, JobKind::End);
        assert!(!job.is_data());
    }

    #[test]
    fn test_job_serialization() {
        let json = serde_json::to_string(&Job::data(2, 97)).unwrap();
        assert_eq!(json, r#"{"producer_id":2,"kind":"data","payload":97}"#);
    }
}
