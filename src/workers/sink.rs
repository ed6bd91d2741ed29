//! # Destino de Resultados
//! src/workers/sink.rs
//!
//! Los consumidores reportan aquí cada primo encontrado. La salida del
//! programa es una línea por primo en stdout:
//!
//! ```text
//! Found prime number: 12237687217288430093
//! ```

use parking_lot::Mutex;
use serde::Serialize;
use std::io::{self, Write};

/// Un primo encontrado por un consumidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimeFound {
    pub value: u64,
    pub producer_id: usize,
    pub consumer_id: usize,
}

/// Destino de los primos encontrados, compartido por todos los consumidores
pub trait ResultSink: Send + Sync {
    fn report(&self, found: &PrimeFound) -> io::Result<()>;
}

/// Línea legible para un primo
pub fn format_line(found: &PrimeFound) -> String {
    format!("Found prime number: {}", found.value)
}

/// Escribe una línea por primo en cualquier `Write`
///
/// El mutex garantiza que las líneas de distintos consumidores no se mezclen.
pub struct LineSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl LineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ResultSink for LineSink<W> {
    fn report(&self, found: &PrimeFound) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", format_line(found))?;
        writer.flush()
    }
}

/// Guarda los primos en memoria
#[derive(Debug, Default)]
pub struct MemorySink {
    found: Mutex<Vec<PrimeFound>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found(&self) -> Vec<PrimeFound> {
        self.found.lock().clone()
    }

    pub fn values(&self) -> Vec<u64> {
        self.found.lock().iter().map(|f| f.value).collect()
    }
}

impl ResultSink for MemorySink {
    fn report(&self, found: &PrimeFound) -> io::Result<()> {
        self.found.lock().push(*found);
        Ok(())
    }
}
