//! # Registro Nombrado del Canal
//! src/jobs/lease.rs
//!
//! La cola vive en memoria, pero el canal tiene un nombre global
//! (`/prime_jobs_mq` por defecto). Mientras una corrida está activa existe
//! un archivo `<registry_dir>/<nombre>.lease` con sus metadatos en JSON:
//! - crear el canal falla si el nombre ya está tomado
//! - destruir el canal borra el archivo
//! - `--remove` borra un lease huérfano (de una corrida que murió) sin
//!   ejecutar trabajo

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Largo máximo de un nombre de canal, en bytes
pub const MAX_NAME_LEN: usize = 255;

/// Contenido del archivo de lease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    pub name: String,
    pub pid: u32,
    pub capacity: usize,
    /// Segundos desde UNIX_EPOCH
    pub created_at: u64,
}

/// Valida un nombre de canal: `/nombre`, sin más `/`, hasta 255 bytes
pub fn validate_name(name: &str) -> Result<()> {
    if !name.starts_with('/') {
        return Err(Error::Configuration(
            "Queue name must begin with a slash /".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::Configuration(format!(
            "Queue name cannot be longer than {} bytes",
            MAX_NAME_LEN
        )));
    }
    if name.len() == 1 || name[1..].contains('/') {
        return Err(Error::Configuration(
            "Queue name must be a slash followed by at least one character and no other slashes"
                .to_string(),
        ));
    }
    Ok(())
}

/// Ruta del archivo de lease para un nombre
pub fn lease_path(registry_dir: &Path, name: &str) -> PathBuf {
    registry_dir.join(format!("{}.lease", name.trim_start_matches('/')))
}

/// Lease activo sobre un nombre de canal
///
/// Se libera explícitamente con `release`. Si se descarta sin liberar
/// (por ejemplo en un panic) se intenta borrar el archivo igual.
#[derive(Debug)]
pub struct ChannelLease {
    name: String,
    path: PathBuf,
    released: bool,
}

impl ChannelLease {
    /// Toma el nombre creando el archivo de forma exclusiva
    pub fn acquire(registry_dir: &Path, name: &str, capacity: usize) -> Result<Self> {
        validate_name(name)?;

        fs::create_dir_all(registry_dir).map_err(|e| {
            Error::resource(name, format!("cannot create {}: {}", registry_dir.display(), e))
        })?;

        let path = lease_path(registry_dir, name);
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::resource(
                    name,
                    format!(
                        "already in use ({}); remove an orphaned channel with --remove",
                        path.display()
                    ),
                ));
            }
            Err(e) => {
                return Err(Error::resource(name, format!("cannot create {}: {}", path.display(), e)));
            }
        };

        let record = LeaseRecord {
            name: name.to_string(),
            pid: std::process::id(),
            capacity,
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        // Desde aquí el archivo es nuestro: si falla la escritura, Drop lo borra
        let lease = Self {
            name: name.to_string(),
            path,
            released: false,
        };

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &record)
            .map_err(|e| Error::resource(name, format!("cannot write lease: {}", e)))?;
        writer
            .flush()
            .map_err(|e| Error::resource(name, format!("cannot write lease: {}", e)))?;

        tracing::debug!(channel = %lease.name, path = %lease.path.display(), "channel lease acquired");
        Ok(lease)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Destruye el registro del canal
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.path).map_err(|e| {
            Error::resource(&self.name, format!("cannot remove {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(channel = %self.name, "channel lease released");
        Ok(())
    }

    /// Lee el registro de un lease existente
    pub fn read_record(registry_dir: &Path, name: &str) -> Result<LeaseRecord> {
        let path = lease_path(registry_dir, name);
        let file = File::open(&path)
            .map_err(|e| Error::resource(name, format!("cannot open {}: {}", path.display(), e)))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::resource(name, format!("corrupt lease {}: {}", path.display(), e)))
    }

    /// Borra un lease huérfano por nombre
    ///
    /// Retorna el registro si se pudo leer; un archivo corrupto se borra
    /// igual. Si no existe ningún lease con ese nombre es un error.
    pub fn remove_orphan(registry_dir: &Path, name: &str) -> Result<Option<LeaseRecord>> {
        validate_name(name)?;

        let record = Self::read_record(registry_dir, name).ok();
        let path = lease_path(registry_dir, name);
        fs::remove_file(&path).map_err(|e| {
            Error::resource(name, format!("failed to remove {}: {}", path.display(), e))
        })?;

        Ok(record)
    }
}

impl Drop for ChannelLease {
    fn drop(&mut self) {
        if !self.released {
            let _ = fs::remove_file(&self.path);
        }
    }
}
