//! # Logging
//! src/logging.rs
//!
//! Los eventos de `tracing` van a stderr; stdout queda solo para las
//! líneas `Found prime number: N`. El nivel se controla con `RUST_LOG`
//! (por defecto `info`), por ejemplo:
//!
//! ```bash
//! RUST_LOG=prime_jobs=debug ./prime_jobs
//! ```

use tracing_subscriber::{fmt, EnvFilter};

/// Instala el subscriber global
///
/// Retorna `false` si ya había uno instalado (por ejemplo en tests).
pub fn init_logging() -> bool {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_logging();
        assert!(!init_logging());
    }
}
