//! `SearchLog.txt`: una línea `"<nombre>: <cantidad>"` por step completado.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use matscreen_core::checkpoint::{format_entry, AuditLog};
use matscreen_core::errors::StoreError;

use super::atomic::write_atomic;
use crate::error::PersistenceError;

pub const AUDIT_LOG_FILE: &str = "SearchLog.txt";

#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    /// Log en `<dir>/SearchLog.txt`. No crea el archivo hasta el primer `begin`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(AUDIT_LOG_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn begin(&mut self, initial_tag: &str, count: usize) -> Result<(), StoreError> {
        let line = format_entry(initial_tag, count);
        write_atomic(&self.path, |tmp| {
            writeln!(tmp, "{line}").map_err(|e| PersistenceError::io(tmp.path(), e))
        })?;
        Ok(())
    }

    fn append(&mut self, step_name: &str, count: usize) -> Result<(), StoreError> {
        let mut file = OpenOptions::new().create(true)
                                         .append(true)
                                         .open(&self.path)
                                         .map_err(|e| PersistenceError::io(&self.path, e))?;
        writeln!(file, "{}", format_entry(step_name, count)).map_err(|e| PersistenceError::io(&self.path, e))?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PersistenceError::io(&self.path, e).into()),
        }
    }
}
