//! # Señal de Parada
//! src/jobs/signal.rs
//!
//! Bandera que el coordinador levanta una sola vez, cuando todos los
//! productores terminaron. Se comparte por referencia con los consumidores.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: AtomicBool,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levanta la señal. Retorna `true` solo en la primera llamada.
    pub fn set(&self) -> bool {
        !self.stopped.swap(true, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_set_once() {
        let signal = StopSignal::new();
        assert!(!signal.is_set());
        assert!(signal.set());
        assert!(signal.is_set());
        // idempotente, nunca se baja
        assert!(!signal.set());
        assert!(signal.is_set());
    }

    #[test]
    fn test_visible_across_threads() {
        let signal = StopSignal::new();
        thread::scope(|s| {
            let waiter = s.spawn(|| {
                while !signal.is_set() {
                    thread::yield_now();
                }
            });
            signal.set();
            waiter.join().unwrap();
        });
    }
}
