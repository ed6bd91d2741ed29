//! # Cola Acotada de Jobs
//! src/jobs/queue.rs
//!
//! Cola FIFO thread-safe con capacidad fija, compartida por todos los
//! productores y consumidores:
//! - `push` bloquea mientras la cola está llena (backpressure)
//! - `pop_timeout` bloquea hasta que haya un job o venza el timeout
//! - `close` despierta a todos y hace que las operaciones fallen; los jobs
//!   que ya estaban encolados se siguen entregando
//!
//! Al ser una sola FIFO, el orden de los jobs de un mismo productor se
//! preserva. El intercalado entre productores no está definido.

use crate::error::{Error, Result};
use crate::jobs::job::Job;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use thiserror::Error as ThisError;

/// `push` falló porque la cola fue cerrada. Devuelve el job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum PushError {
    #[error("job queue is closed")]
    Closed(Job),
}

impl PushError {
    pub fn into_inner(self) -> Job {
        match self {
            PushError::Closed(job) => job,
        }
    }
}

/// Resultado no exitoso de `pop_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum PopError {
    /// No llegó ningún job antes del timeout
    #[error("timed out waiting for a job")]
    TimedOut,

    /// La cola está cerrada y vacía
    #[error("job queue is closed and drained")]
    Closed,
}

/// Estado protegido por el mutex
struct QueueState {
    items: VecDeque<Job>,
    closed: bool,
}

/// Cola acotada multi-productor / multi-consumidor
pub struct JobQueue {
    state: Mutex<QueueState>,

    /// Condvar para consumidores esperando jobs
    not_empty: Condvar,

    /// Condvar para productores esperando espacio
    not_full: Condvar,

    capacity: usize,
}

impl JobQueue {
    /// Crea una cola con capacidad fija
    ///
    /// Retorna `Error::Configuration` si la capacidad es 0: una cola sin
    /// espacio bloquearía a todo productor para siempre.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::Configuration(
                "Job queue capacity must be >= 1".to_string(),
            ));
        }

        Ok(Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        })
    }

    /// Encola un job, bloqueando mientras la cola esté llena
    pub fn push(&self, job: Job) -> std::result::Result<(), PushError> {
        let mut state = self.state.lock();

        while state.items.len() >= self.capacity && !state.closed {
            self.not_full.wait(&mut state);
        }

        if state.closed {
            return Err(PushError::Closed(job));
        }

        state.items.push_back(job);
        self.not_empty.notify_one();

        Ok(())
    }

    /// Desencola el job más antiguo, esperando a lo sumo `timeout`
    ///
    /// Con `Duration::ZERO` es un intento no bloqueante.
    pub fn pop_timeout(&self, timeout: Duration) -> std::result::Result<Job, PopError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();

        loop {
            if let Some(job) = state.items.pop_front() {
                self.not_full.notify_one();
                return Ok(job);
            }

            if state.closed {
                return Err(PopError::Closed);
            }

            match deadline {
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return Err(PopError::TimedOut);
                    }
                    // Al despertar (notify o timeout) se vuelve a revisar todo
                    self.not_empty.wait_until(&mut state, deadline);
                }
                None => self.not_empty.wait(&mut state),
            }
        }
    }

    /// Cierra la cola y despierta a todos los threads bloqueados
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Retorna el número de jobs encolados
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::mpsc;
    use std::thread;

    const SHORT: Duration = Duration::from_millis(20);

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(JobQueue::new(0), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_fifo_order() {
        let queue = JobQueue::new(8).unwrap();
        for i in 0..5u64 {
            queue.push(Job::data(0, i * 2 + 1)).unwrap();
        }
        assert_eq!(queue.len(), 5);

        for i in 0..5u64 {
            assert_eq!(queue.pop_timeout(SHORT).unwrap().payload, i * 2 + 1);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_times_out_when_empty() {
        let queue = JobQueue::new(1).unwrap();
        let start = Instant::now();
        assert_eq!(queue.pop_timeout(Duration::from_millis(50)), Err(PopError::TimedOut));
        assert!(start.elapsed() >= Duration::from_millis(50));

        assert_eq!(queue.pop_timeout(Duration::ZERO), Err(PopError::TimedOut));
    }

    #[test]
    fn test_push_blocks_when_full() {
        let capacity = 3;
        let queue = JobQueue::new(capacity).unwrap();
        for i in 0..capacity as u64 {
            queue.push(Job::data(0, i)).unwrap();
        }
        assert!(queue.is_full());

        let (tx, rx) = mpsc::channel();
        thread::scope(|s| {
            let pusher_queue = &queue;
            s.spawn(move || {
                pusher_queue.push(Job::data(0, 99)).unwrap();
                tx.send(()).unwrap();
            });

            // el push número capacity + 1 no puede completarse todavía
            assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
            assert_eq!(queue.len(), capacity);

            // un pop libera espacio
            queue.pop_timeout(SHORT).unwrap();
            rx.recv_timeout(Duration::from_secs(5))
                .expect("push should complete after a pop");
        });

        assert_eq!(queue.len(), capacity);
    }

    #[test]
    fn test_close_delivers_remaining_then_closed() {
        let queue = JobQueue::new(4).unwrap();
        queue.push(Job::data(0, 1)).unwrap();
        queue.push(Job::data(0, 3)).unwrap();
        queue.close();
        queue.close();
        assert!(queue.is_closed());

        assert_eq!(queue.push(Job::data(0, 5)), Err(PushError::Closed(Job::data(0, 5))));
        assert_eq!(queue.pop_timeout(SHORT).unwrap().payload, 1);
        assert_eq!(queue.pop_timeout(SHORT).unwrap().payload, 3);
        assert_eq!(queue.pop_timeout(SHORT), Err(PopError::Closed));
    }

    #[test]
    fn test_close_wakes_blocked_threads() {
        let queue = JobQueue::new(1).unwrap();
        queue.push(Job::data(0, 1)).unwrap();

        thread::scope(|s| {
            let pusher = s.spawn(|| queue.push(Job::data(1, 3)));
            thread::sleep(Duration::from_millis(50));
            queue.close();

            let err = pusher.join().unwrap().unwrap_err();
            assert_eq!(err.into_inner().payload, 3);
        });

        let empty = JobQueue::new(1).unwrap();
        thread::scope(|s| {
            let popper = s.spawn(|| empty.pop_timeout(Duration::from_secs(30)));
            thread::sleep(Duration::from_millis(50));
            empty.close();
            assert_eq!(popper.join().unwrap(), Err(PopError::Closed));
        });
    }

    #[test]
    fn test_multi_producer_multi_consumer() {
        const PRODUCERS: usize = 4;
        const CONSUMERS: usize = 3;
        const PER_PRODUCER: u64 = 250;

        let queue = JobQueue::new(5).unwrap();
        let mut received: Vec<Vec<Job>> = Vec::new();

        thread::scope(|s| {
            let consumers: Vec<_> = (0..CONSUMERS)
                .map(|_| {
                    s.spawn(|| {
                        let mut seen = Vec::new();
                        loop {
                            match queue.pop_timeout(Duration::from_millis(100)) {
                                Ok(job) => {
                                    assert!(queue.len() <= queue.capacity());
                                    seen.push(job);
                                }
                                Err(PopError::Closed) => break,
                                Err(PopError::TimedOut) => continue,
                            }
                        }
                        seen
                    })
                })
                .collect();

            let producers: Vec<_> = (0..PRODUCERS)
                .map(|p| {
                    let queue = &queue;
                    s.spawn(move || {
                        for seq in 0..PER_PRODUCER {
                            queue.push(Job::data(p, seq << 1)).unwrap();
                        }
                    })
                })
                .collect();

            for producer in producers {
                producer.join().unwrap();
            }
            queue.close();

            for consumer in consumers {
                received.push(consumer.join().unwrap());
            }
        });

        // Cada job se entrega exactamente una vez
        let total: usize = received.iter().map(Vec::len).sum();
        assert_eq!(total, PRODUCERS * PER_PRODUCER as usize);

        let mut counts: HashMap<(usize, u64), usize> = HashMap::new();
        for job in received.iter().flatten() {
            *counts.entry((job.producer_id, job.payload >> 1)).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), PRODUCERS * PER_PRODUCER as usize);
        assert!(counts.values().all(|&c| c == 1));

        // Cada consumidor ve los jobs de un productor en orden
        for seen in &received {
            let mut last: HashMap<usize, u64> = HashMap::new();
            for job in seen {
                let seq = job.payload >> 1;
                if let Some(&prev) = last.get(&job.producer_id) {
                    assert!(seq > prev, "producer {} out of order", job.producer_id);
                }
                last.insert(job.producer_id, seq);
            }
        }
    }
}
