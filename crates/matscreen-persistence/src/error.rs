//! Errores de persistencia.
//! Mapea errores de IO / serde / csv a variantes propias y, en la frontera
//! con el motor, a `StoreError`.

use std::path::PathBuf;

use matscreen_core::errors::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("json error in {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("csv error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("could not persist temporary file to {path}: {message}")]
    Persist { path: PathBuf, message: String },
    #[error("invalid data in {path}: {message}")]
    InvalidData { path: PathBuf, message: String },
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv { path: path.into(), source }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Json { .. } | PersistenceError::InvalidData { .. } => StoreError::Serialization(err.to_string()),
            PersistenceError::Io { .. } | PersistenceError::Csv { .. } | PersistenceError::Persist { .. } => {
                StoreError::Io(err.to_string())
            }
        }
    }
}
