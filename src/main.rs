//! # Prime Jobs - Entry Point
//! src/main.rs
//!
//! Punto de entrada: parsea la configuración, instala el logging y ejecuta
//! una corrida completa (o solo borra el canal con `--remove`).

use anyhow::{Context, Result};
use prime_jobs::config::Config;
use prime_jobs::coordinator::{Coordinator, CoordinatorSettings};
use prime_jobs::jobs::ChannelLease;
use prime_jobs::workers::LineSink;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::new();
    prime_jobs::logging::init_logging();

    config.validate().context("invalid configuration")?;

    if config.remove {
        let registry_dir = config.registry_dir();
        let record = ChannelLease::remove_orphan(&registry_dir, &config.queue_name)?;
        match record {
            Some(record) => tracing::info!(
                channel = %config.queue_name,
                pid = record.pid,
                "removed orphaned channel"
            ),
            None => tracing::info!(channel = %config.queue_name, "removed unreadable channel lease"),
        }
        return Ok(());
    }

    let coordinator = Coordinator::new(CoordinatorSettings::from_config(&config));
    let sink = LineSink::stdout();
    let report = coordinator.run(&sink)?;

    if config.json_report {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize run report")?;
        println!("{}", json);
    }

    Ok(())
}
