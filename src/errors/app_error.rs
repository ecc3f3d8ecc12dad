use matscreen_core::errors::{BatchError, CoreEngineError};
use matscreen_persistence::PersistenceError;
use thiserror::Error;

/// Errores de la aplicación `matscreen`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Engine(#[from] CoreEngineError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Pool(#[from] BatchError),
    #[error("could not render report: {0}")]
    Report(#[from] serde_json::Error),
}

impl AppError {
    /// 2 para errores de uso o configuración, 1 para fallos de la cadena.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Engine(CoreEngineError::UnknownStep(_) | CoreEngineError::DuplicateStep(_)) => 2,
            _ => 1,
        }
    }
}
