//! # Canal de Jobs
//!
//! Todo lo que comparten productores y consumidores:
//!
//! - `job`: la unidad de trabajo
//! - `queue`: cola acotada bloqueante con timeout y cierre
//! - `signal`: bandera de parada que levanta el coordinador
//! - `lease`: registro nombrado del canal en el sistema de archivos

pub mod job;
pub mod lease;
pub mod queue;
pub mod signal;

pub use job::{Job, JobKind};
pub use lease::{ChannelLease, LeaseRecord};
pub use queue::{JobQueue, PopError, PushError};
pub use signal::StopSignal;
