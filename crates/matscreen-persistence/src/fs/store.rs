//! Checkpoints como archivos JSON, uno por artifact.
//!
//! Layout del directorio de búsqueda:
//! - `<posición>_<tag>.json`: artifacts de la cadena.
//! - `ProblemRecords_<i>_<step>.json`: registros desviados por un step.
//!
//! El JSON se escribe con indentación de 4 espacios. La existencia del
//! archivo es la única señal de artifact ya computado.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use matscreen_core::checkpoint::CheckpointStore;
use matscreen_core::errors::StoreError;
use matscreen_core::model::{ArtifactId, RecordCollection};
use serde::Serialize;

use super::atomic::write_atomic;
use crate::error::PersistenceError;

pub(crate) const CHECKPOINT_EXT: &str = "json";

#[derive(Debug, Clone)]
pub struct FsCheckpointStore {
    root: PathBuf,
}

impl FsCheckpointStore {
    /// Abre (y crea si hace falta) el directorio de una búsqueda.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PersistenceError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(format!("{}.{CHECKPOINT_EXT}", id.key()))
    }

    fn read(&self, id: &ArtifactId) -> Result<RecordCollection, PersistenceError> {
        let path = self.path_for(id);
        let bytes = fs::read(&path).map_err(|e| PersistenceError::io(&path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| PersistenceError::json(&path, e))
    }

    fn write(&self, id: &ArtifactId, records: &RecordCollection) -> Result<(), PersistenceError> {
        let path = self.path_for(id);
        write_atomic(&path, |tmp| {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(tmp, formatter);
            records.serialize(&mut ser).map_err(|e| PersistenceError::json(&path, e))
        })?;
        debug!("checkpoint written path={} records={}", path.display(), records.count());
        Ok(())
    }
}

impl CheckpointStore for FsCheckpointStore {
    fn exists(&self, id: &ArtifactId) -> Result<bool, StoreError> {
        Ok(self.path_for(id).is_file())
    }

    fn load(&self, id: &ArtifactId) -> Result<RecordCollection, StoreError> {
        if !self.path_for(id).is_file() {
            return Err(StoreError::NotFound(id.key()));
        }
        Ok(self.read(id)?)
    }

    fn save(&mut self, id: &ArtifactId, records: &RecordCollection) -> Result<(), StoreError> {
        Ok(self.write(id, records)?)
    }

    fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| PersistenceError::io(&self.root, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| PersistenceError::io(&self.root, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == CHECKPOINT_EXT) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
