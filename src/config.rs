//! Configuración de una búsqueda.
//!
//! Variables de entorno (`.env` incluido):
//! - `MATSCREEN_WORKERS`: hilos del pool (0 = uno por CPU).
//! - `MATSCREEN_BATCH_SIZE`: tamaño de lote de los steps paralelos.
//! - `MATSCREEN_STRUCTURES_DIR`: directorio con los `<MaterialId>.CIF`;
//!   por defecto `<search_root>/by_id`.
//!
//! El almacenamiento (`MATSCREEN_SEARCH_ROOT`, `MATSCREEN_EXPORT`) lo
//! resuelve `StoreConfig`. Los flags de la CLI pisan estos valores.
use std::env;
use std::path::PathBuf;

use matscreen_core::constants::DEFAULT_BATCH_SIZE;
use matscreen_persistence::{init_dotenv, StoreConfig};

use crate::errors::AppError;

pub const STRUCTURES_SUBDIR: &str = "by_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub store: StoreConfig,
    pub workers: usize,
    pub batch_size: usize,
    structures_dir: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { store: StoreConfig::default(), workers: 0, batch_size: DEFAULT_BATCH_SIZE, structures_dir: None }
    }
}

impl SearchConfig {
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        let defaults = Self::default();
        Self { store: StoreConfig::from_env(),
               workers: env_usize("MATSCREEN_WORKERS")?.unwrap_or(defaults.workers),
               batch_size: env_usize("MATSCREEN_BATCH_SIZE")?.unwrap_or(defaults.batch_size),
               structures_dir: env::var("MATSCREEN_STRUCTURES_DIR").ok().map(PathBuf::from) }.validated()
    }

    pub fn with_structures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.structures_dir = Some(dir.into());
        self
    }

    pub fn structures_dir(&self) -> PathBuf {
        self.structures_dir.clone().unwrap_or_else(|| self.store.search_root.join(STRUCTURES_SUBDIR))
    }

    pub fn validated(self) -> Result<Self, AppError> {
        if self.batch_size == 0 {
            return Err(AppError::Config("batch size must be greater than zero".into()));
        }
        Ok(self)
    }
}

fn env_usize(key: &str) -> Result<Option<usize>, AppError> {
    match env::var(key) {
        Ok(raw) => raw.trim()
                      .parse()
                      .map(Some)
                      .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structures_default_to_by_id_under_the_root() {
        let mut cfg = SearchConfig::default();
        cfg.store.search_root = PathBuf::from("/data/GNoME");
        assert_eq!(cfg.structures_dir(), PathBuf::from("/data/GNoME/by_id"));
        let cfg = cfg.with_structures_dir("/cifs");
        assert_eq!(cfg.structures_dir(), PathBuf::from("/cifs"));
    }

    #[test]
    fn zero_batch_size_is_a_config_error() {
        let cfg = SearchConfig { batch_size: 0, ..SearchConfig::default() };
        assert!(matches!(cfg.validated(), Err(AppError::Config(_))));
    }
}
