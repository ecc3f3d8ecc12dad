//! Contrato de almacenamiento de checkpoints.
//!
//! Un store guarda colecciones de registros bajo un `ArtifactId`. La sola
//! existencia de un artifact es la señal de "ya computado": el orquestador
//! no compara contenidos ni fechas. Las implementaciones deben escribir de
//! forma atómica (el artifact queda completo o no existe).

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::errors::StoreError;
use crate::model::{ArtifactId, RecordCollection};

pub trait CheckpointStore {
    fn exists(&self, id: &ArtifactId) -> Result<bool, StoreError>;
    /// Carga un artifact; `StoreError::NotFound` si no existe.
    fn load(&self, id: &ArtifactId) -> Result<RecordCollection, StoreError>;
    /// Persiste un artifact, reemplazando uno previo con la misma clave.
    fn save(&mut self, id: &ArtifactId, records: &RecordCollection) -> Result<(), StoreError>;
    /// Claves existentes, ordenadas.
    fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Store en memoria. Lleva un contador de escrituras por clave para poder
/// verificar que una reanudación no recomputa artifacts existentes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCheckpointStore {
    artifacts: IndexMap<String, RecordCollection>,
    saves: HashMap<String, usize>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de veces que se escribió `id`.
    pub fn save_count(&self, id: &ArtifactId) -> usize {
        self.saves.get(&id.key()).copied().unwrap_or(0)
    }

    /// Escrituras totales, todas las claves.
    pub fn total_saves(&self) -> usize {
        self.saves.values().sum()
    }

    /// Elimina un artifact (simula un checkpoint borrado a mano).
    pub fn remove(&mut self, id: &ArtifactId) -> Option<RecordCollection> {
        self.artifacts.shift_remove(&id.key())
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    fn exists(&self, id: &ArtifactId) -> Result<bool, StoreError> {
        Ok(self.artifacts.contains_key(&id.key()))
    }

    fn load(&self, id: &ArtifactId) -> Result<RecordCollection, StoreError> {
        self.artifacts
            .get(&id.key())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.key()))
    }

    fn save(&mut self, id: &ArtifactId, records: &RecordCollection) -> Result<(), StoreError> {
        let key = id.key();
        *self.saves.entry(key.clone()).or_insert(0) += 1;
        self.artifacts.insert(key, records.clone());
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self.artifacts.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
